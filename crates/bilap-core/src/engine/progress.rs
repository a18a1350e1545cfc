#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Opens a phase containing one counted task of `total_steps` steps.
    ///
    /// The returned guard emits `TaskFinish` and `PhaseFinish` when dropped, so the
    /// events stay balanced even when a sweep bails out early with an error.
    pub fn phase(&self, name: &'static str, total_steps: u64) -> PhaseGuard<'_, 'a> {
        self.report(Progress::PhaseStart { name });
        self.report(Progress::TaskStart { total_steps });
        PhaseGuard { reporter: self }
    }
}

pub struct PhaseGuard<'r, 'a> {
    reporter: &'r ProgressReporter<'a>,
}

impl PhaseGuard<'_, '_> {
    #[inline]
    pub fn tick(&self) {
        self.reporter.report(Progress::TaskIncrement);
    }

    pub fn message(&self, text: impl Into<String>) {
        self.reporter.report(Progress::Message(text.into()));
    }
}

impl Drop for PhaseGuard<'_, '_> {
    fn drop(&mut self) {
        self.reporter.report(Progress::TaskFinish);
        self.reporter.report(Progress::PhaseFinish);
    }
}
