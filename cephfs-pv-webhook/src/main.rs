#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cephfs_pv_webhook::Args::parse_and_run().await
}
