#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    syllabus_scheduler::run().await
}
