//! Command handlers.

use super::OutputFormat;
use promptcanvas::{
    CoordinatorConfig, GenerationClient, OllamaClient, OllamaClientConfig, Position, PromptCard,
    Stack, StackCoordinator, StackId, compile_prompt, elapsed_millis, ollama_coordinator,
};
use tracing::{info, instrument, warn};

/// Handles the run command.
///
/// Builds one stack from the given cards, one comparison stack per model in
/// `compare`, generates all of them concurrently and prints the results.
#[instrument(skip_all, fields(prompts = prompts.len(), comparisons = compare.len()))]
pub async fn run_command(
    config: CoordinatorConfig,
    prompts: Vec<String>,
    muted: Vec<String>,
    host: Option<String>,
    model: Option<String>,
    compare: Vec<String>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let host = host.unwrap_or_else(|| config.default_host().clone());
    let model = model.unwrap_or_else(|| config.default_model().clone());
    let coordinator = ollama_coordinator(config)?;

    let primary = coordinator.add_stack(Position::default()).await;
    fill_stack(&coordinator, primary, &prompts, &muted, &host, &model).await;

    for compare_model in &compare {
        let Some(comparison) = coordinator.create_comparison_stack(primary).await else {
            warn!("Original stack vanished, skipping comparison");
            continue;
        };
        fill_stack(&coordinator, comparison, &prompts, &muted, &host, compare_model).await;
    }

    let outcomes = coordinator.generate_all().await;
    let progress = coordinator.batch_progress().await;
    info!(
        stacks = outcomes.len(),
        elapsed_ms = elapsed_millis(progress.elapsed),
        "Generation finished"
    );

    let stacks = coordinator.stacks().await;
    match format {
        OutputFormat::Human => stacks.iter().for_each(print_stack),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stacks)?),
    }
    Ok(())
}

/// Replaces the default cards' content with the requested prompt cards and
/// LLM settings.
async fn fill_stack<C: GenerationClient + 'static>(
    coordinator: &StackCoordinator<C>,
    stack: StackId,
    prompts: &[String],
    muted: &[String],
    host: &str,
    model: &str,
) {
    let Some(first) = coordinator
        .stack(stack)
        .await
        .and_then(|s| s.prompt_cards().next().map(|card| *card.id()))
    else {
        return;
    };

    let mut texts = prompts.iter();
    if let Some(text) = texts.next() {
        coordinator.set_prompt_text(stack, first, text.as_str()).await;
    }
    for text in texts {
        if let Some(card) = coordinator.add_prompt_card(stack).await {
            coordinator.set_prompt_text(stack, card, text.as_str()).await;
        }
    }
    for text in muted {
        if let Some(card) = coordinator.add_prompt_card(stack).await {
            coordinator.set_prompt_text(stack, card, text.as_str()).await;
            coordinator.toggle_mute(stack, card).await;
        }
    }
    coordinator.set_llm_config(stack, host, model).await;
}

fn print_stack(stack: &Stack) {
    let (host, model) = stack
        .llm_card()
        .map_or(("?", "?"), |llm| (llm.host().as_str(), llm.model().as_str()));
    let label = if *stack.is_comparison() {
        "comparison"
    } else {
        "stack"
    };
    println!("== {label}: {model} @ {host} ==");
    match stack.response_card() {
        Some(response) => {
            println!("{}", response.text());
            if let Some(time) = response.generation_time() {
                println!("({:.2}s)", time.as_secs_f64());
            }
        }
        None => println!("(no response)"),
    }
    println!();
}

/// Handles the compile command.
pub fn compile_command(prompts: Vec<String>, muted: Vec<String>) {
    let cards = prompts
        .into_iter()
        .map(|text| (text, false))
        .chain(muted.into_iter().map(|text| (text, true)))
        .enumerate()
        .map(|(index, (text, is_muted))| PromptCard::new(text, index).with_muted(is_muted).into())
        .collect();
    let stack = Stack::new(Position::default(), cards);
    println!("{}", compile_prompt(&stack));
}

/// Handles the probe command. Returns whether the server answered.
pub async fn probe_command(
    config: CoordinatorConfig,
    host: Option<String>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let host = host.unwrap_or_else(|| config.default_host().clone());
    let client = OllamaClient::with_config(&OllamaClientConfig::from_env())?;
    let reachable = client.probe(&host).await;
    if reachable {
        println!("{host}: reachable");
    } else {
        println!("{host}: not reachable");
    }
    Ok(reachable)
}
