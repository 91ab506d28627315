use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFprobeAdapter, FsLocalAdapter, TracingNotifier};
use crate::app::split_interactor::SplitInteractor;
use crate::engine::EngineConfig;
use crate::ports::{FsPort, NotifierPort, ProbePort, TrimPort};

pub trait AppContainer: Send + Sync {
    fn split_interactor(&self) -> Arc<SplitInteractor>;
}

pub struct DefaultAppContainer {
    split_interactor: Arc<SplitInteractor>,
}

impl DefaultAppContainer {
    /// Wire the production adapters around the given engine binaries
    pub fn new(engine: EngineConfig, verbose_progress: bool) -> Self {
        let probe_port = Arc::new(FFprobeAdapter::new(engine.clone()));
        let trim_port = Arc::new(FFmpegAdapter::new(engine));
        let fs_port = Arc::new(FsLocalAdapter::new());
        let notifier = Arc::new(TracingNotifier::new().with_progress(verbose_progress));

        Self::with_ports(probe_port, trim_port, fs_port, notifier)
    }

    /// Same as [`DefaultAppContainer::new`] but probes through libav bindings
    #[cfg(feature = "libav")]
    pub fn with_libav_probe(
        engine: EngineConfig,
        verbose_progress: bool,
    ) -> Result<Self, crate::domain::errors::DomainError> {
        let probe_port = Arc::new(crate::adapters::ProbeLibavAdapter::new()?);
        let trim_port = Arc::new(FFmpegAdapter::new(engine));
        let fs_port = Arc::new(FsLocalAdapter::new());
        let notifier = Arc::new(TracingNotifier::new().with_progress(verbose_progress));

        Ok(Self::with_ports(probe_port, trim_port, fs_port, notifier))
    }

    pub fn with_ports(
        probe_port: Arc<dyn ProbePort>,
        trim_port: Arc<dyn TrimPort>,
        fs_port: Arc<dyn FsPort>,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        let split_interactor = Arc::new(SplitInteractor::new(
            probe_port,
            trim_port,
            fs_port,
            notifier,
        ));

        Self { split_interactor }
    }
}

impl AppContainer for DefaultAppContainer {
    fn split_interactor(&self) -> Arc<SplitInteractor> {
        Arc::clone(&self.split_interactor)
    }
}
