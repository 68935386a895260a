use crate::{admission::Admission, mutate::PodAnnotator};
use anyhow::{bail, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[clap(
    name = "cephfs-pv-webhook",
    about = "A mutating admission webhook that annotates Pods"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "cephfs_pv_webhook=info,warn",
        env = "CEPHFS_PV_WEBHOOK_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    server: kubert::ServerArgs,

    #[clap(flatten)]
    admin: kubert::AdminArgs,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            client,
            server,
            admin,
        } = self;

        let runtime = kubert::Runtime::builder()
            .with_log(log_level, log_format)
            .with_admin(admin.into_builder())
            .with_client(client)
            .with_server(server)
            .build()
            .await?;

        let annotator = Arc::new(PodAnnotator::default());
        info!(
            webhook = crate::WEBHOOK_NAME,
            path = crate::WEBHOOK_PATH,
            "Serving pod admission reviews"
        );
        let runtime = runtime.spawn_server(Admission::new(annotator));

        // Block the main thread on the shutdown signal. Once it fires, wait for
        // in-flight admission requests to complete before exiting.
        if runtime.run().await.is_err() {
            bail!("Aborted");
        }

        Ok(())
    }
}
