#[tokio::main]
async fn main() {
    tusa_stories_lib::run().await
}
