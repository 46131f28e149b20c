use clap::Parser;
use playbook_lang::utils::error::ErrorSeverity;
use playbook_lang::utils::{logger, validation::Validate};
use playbook_lang::{
    CliConfig, Compiler, ConversionEngine, ConversionRequest, FileInput, FileOutput, LocalStorage,
    ModifiedWatcher, PlaybookError, RenderOutcome, RenderTrigger,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    let settings = match config.validate().and_then(|_| config.resolve_settings()) {
        Ok(settings) => settings,
        Err(e) => fail(e),
    };

    let compiler = Compiler::new(settings.render_settings()).with_strict(settings.strict());
    let request = ConversionRequest::new(config.input.clone(), config.output.clone(), config.emit);
    if let Err(e) = request.validate() {
        fail(e);
    }

    if config.watch {
        return watch(compiler, &request, Duration::from_millis(config.poll_ms)).await;
    }

    let engine = ConversionEngine::new(LocalStorage::new("."), compiler);
    match engine.run(&request).await {
        Ok(report) => {
            tracing::info!(
                "✅ {} players, {} interactions, {} warnings",
                report.entities,
                report.interactions,
                report.warnings
            );
            println!(
                "Successfully converted {} to {}",
                request.input.display(),
                report.output.display()
            );
            Ok(())
        }
        Err(e) => fail(e),
    }
}

fn fail(e: PlaybookError) -> ! {
    tracing::error!(
        "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}

/// Polls the input's mtime and re-renders on every change, including once at startup.
async fn watch(
    compiler: Compiler,
    request: &ConversionRequest,
    poll: Duration,
) -> anyhow::Result<()> {
    let trigger = RenderTrigger::new(
        compiler.emitting(request.emit),
        FileInput::new(&request.input),
        FileOutput::new(&request.output),
    );

    tracing::info!(
        "👀 Watching {} -> {} (Ctrl-C to stop)",
        request.input.display(),
        request.output.display()
    );

    let mut watcher = ModifiedWatcher::new(&request.input);
    let mut ticker = tokio::time::interval(poll);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !watcher.poll() {
                    continue;
                }

                match trigger.fire() {
                    Ok(RenderOutcome::Rendered { seq }) => {
                        tracing::info!("✅ Render #{} written to {}", seq, request.output.display());
                    }
                    Ok(RenderOutcome::Failed { seq, .. }) => {
                        tracing::warn!("Render #{} failed; fix the playbook and save again", seq);
                    }
                    Ok(RenderOutcome::Superseded { seq }) => {
                        tracing::debug!("Render #{} superseded", seq);
                    }
                    Err(e) => {
                        tracing::error!("❌ {}", e.user_friendly_message());
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                return Ok(());
            }
        }
    }
}
