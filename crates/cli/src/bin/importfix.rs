use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    importfix_cli::main_entry().await
}
