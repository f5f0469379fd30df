use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// The size of the [`ThreadPool`] used by a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Threads {
    /// Rayon's default number of threads.
    #[default]
    Default,
    NumThreads(usize),
}

impl Threads {
    pub fn build(self) -> Result<ThreadPool, ThreadPoolBuildError> {
        match self {
            Self::Default => ThreadPoolBuilder::new().build(),
            Self::NumThreads(num_threads) => {
                ThreadPoolBuilder::new().num_threads(num_threads).build()
            }
        }
    }
}

impl From<Option<usize>> for Threads {
    fn from(num_threads: Option<usize>) -> Self {
        num_threads.map_or(Threads::Default, Threads::NumThreads)
    }
}
