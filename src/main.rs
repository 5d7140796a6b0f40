use recipe_recommendation_service::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_tracing_subscriber, init_tracing_subscriber},
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let tracing_subscriber = get_tracing_subscriber(
        "recipe_recommendation_service".into(),
        "info".into(),
        std::io::stdout,
    );
    init_tracing_subscriber(tracing_subscriber);

    // Panics if the configuration can't be read
    let configuration = get_configuration().expect("Failed to read configuration.");
    let demo_query = configuration.agent.demo_query.clone();

    let application = match Application::build(configuration).await {
        Ok(application) => application,
        Err(error) => panic!("Failed to build application: {:?}", error),
    };

    let answer = match application.recommend(&demo_query).await {
        Ok(answer) => answer,
        Err(error) => panic!("Failed to answer the demo query: {:?}", error),
    };

    println!("\n🔹 {}", answer);

    Ok(())
}
