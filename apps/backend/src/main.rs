#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rehab_panel_backend::run().await
}
