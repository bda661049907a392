use clap::Parser;
use kasane::prelude::*;
use log::LevelFilter;
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};

/// Interactive driver for a kasane flow: renders the open layers as text
/// and maps line input onto the engine's navigation operations.
#[derive(Parser)]
#[command(name = "kasane-cli", about = "Walk a demo flow from the terminal")]
struct Cli {
    /// Start directly at this node id (deep-link entry)
    #[arg(long)]
    start_at: Option<String>,

    /// Log applied transitions and rejected operations to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Routes the engine's `log` output to stderr when `--verbose` is given.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        eprintln!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

// --- Demo handlers ---------------------------------------------------------

struct PromptHandler {
    handler_ref: &'static str,
    prompt: &'static str,
}

impl StepHandler for PromptHandler {
    fn handler_ref(&self) -> &str {
        self.handler_ref
    }

    fn run(&self, envelope: &StepEnvelope) -> Value {
        print!("[{}] {} > ", envelope.node_id, self.prompt);
        let _ = io::stdout().flush();
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
        json!({ "answer": line.trim() })
    }
}

fn demo_flow() -> std::result::Result<FlowDefinition, DefinitionError> {
    FlowBuilder::new("demo")
        .title("Kasane demo")
        .start("plan")
        .node(
            NodeBuilder::new("plan", "prompt")
                .input("hint", json!("type 'basic' or anything else"))
                .route_when(
                    |output, _, _| output["answer"] == json!("basic"),
                    "confirm",
                )
                .route_always("payment"),
        )
        .node(
            NodeBuilder::new("payment", "prompt")
                .depth(1)
                .route_always("confirm"),
        )
        .node(NodeBuilder::new("confirm", "prompt"))
        .build()
}

fn registry() -> HandlerRegistry {
    HandlerRegistry::new()
        .with(Box::new(PromptHandler {
            handler_ref: "prompt",
            prompt: "enter a value",
        }))
}

fn main() -> Result<()> {
    let args = Cli::parse();
    if args.verbose && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }

    let mut engine = FlowEngine::new(demo_flow()?);
    let handlers = registry();

    let generation = engine.start(StartOptions {
        start_node_override: args.start_at,
        ..StartOptions::default()
    })?;

    // Drive the frontmost surface until the flow terminates. Entering
    // "back" navigates instead of completing.
    loop {
        let Some(surface) = engine.surfaces().into_iter().last() else {
            break;
        };
        let Some(envelope) = engine.envelope(surface.depth) else {
            break;
        };
        let Some(handler) = handlers.resolve(&envelope.handler_ref) else {
            eprintln!("no handler registered for '{}'", envelope.handler_ref);
            break;
        };

        let output = handler.run(&envelope);
        let progress = if output["answer"] == json!("back") {
            engine.go_back(generation, surface.depth)
        } else {
            engine.complete_node(generation, surface.depth, output)?
        };

        if let Progress::Finished(completion) = progress {
            println!("flow '{}' finished:", completion.flow);
            println!("{}", serde_json::to_string_pretty(&completion)?);
            break;
        }
    }

    Ok(())
}
