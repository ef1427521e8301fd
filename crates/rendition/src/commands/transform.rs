/*
 * transform.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Transform command implementation
 */

//! Transform command implementation.
//!
//! Loads a JSON document into a block arena, runs the requested
//! transformations and prints the result. When some transformations fail,
//! the document is still printed (with the changes of every pass that ran)
//! and the command exits with an error listing the failures.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rendition_blocks::{BlockArena, BlockId, EventRecorder, Syntax};
use rendition_core::{
    RenderingContext, RenditionConfig, TracingObserver, TransformationContext,
    TransformationManager, TransformationRegistry,
};
use tracing::{debug, info};

use super::read_document;
use crate::OutputFormat;

/// Arguments for the transform command
#[derive(Debug)]
pub struct TransformArgs {
    pub input: String,
    pub config: Option<PathBuf>,
    pub transformations: Vec<String>,
    pub syntax: Option<String>,
    pub target_syntax: Option<String>,
    pub id: Option<String>,
    pub restricted: bool,
    pub output: OutputFormat,
}

/// Execute the transform command
pub fn execute(args: TransformArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => RenditionConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => RenditionConfig::default(),
    };

    let document = read_document(&args.input)?;
    let mut arena = BlockArena::new();
    let root = arena.insert_fragment(&document);
    debug!(blocks = arena.len(), "Loaded document");

    let ctx = build_context(&args, root)?;
    let manager = TransformationManager::new(TransformationRegistry::with_builtins(), config)
        .with_observer(std::sync::Arc::new(TracingObserver::new()));
    let mut rendering = RenderingContext::new();

    let result = manager.perform_transformations(&mut arena, root, &ctx, &mut rendering);
    print!("{}", render_output(&arena, root, args.output)?);

    match result {
        Ok(()) => {
            info!("Transformed {}", args.input);
            Ok(())
        }
        Err(failure) => Err(anyhow!(failure).context("Transformations failed")),
    }
}

fn build_context(args: &TransformArgs, root: BlockId) -> Result<TransformationContext> {
    let mut ctx = TransformationContext::new(root).with_restricted(args.restricted);
    if let Some(syntax) = &args.syntax {
        ctx = ctx.with_syntax(parse_syntax(syntax)?);
    }
    if let Some(syntax) = &args.target_syntax {
        ctx = ctx.with_target_syntax(parse_syntax(syntax)?);
    }
    if let Some(id) = &args.id {
        ctx = ctx.with_id(id.clone());
    }
    if !args.transformations.is_empty() {
        ctx = ctx.with_transformation_names(args.transformations.iter().cloned());
    }
    Ok(ctx)
}

fn parse_syntax(value: &str) -> Result<Syntax> {
    value
        .parse::<Syntax>()
        .with_context(|| format!("Invalid syntax '{value}'"))
}

fn render_output(arena: &BlockArena, root: BlockId, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Events => {
            let mut recorder = EventRecorder::new();
            arena.traverse(root, &mut recorder);
            Ok(recorder.to_string())
        }
        OutputFormat::Json => {
            let fragment = arena
                .to_fragment(root)
                .context("Document root was destroyed by a transformation")?;
            let mut json = serde_json::to_string_pretty(&fragment)?;
            json.push('\n');
            Ok(json)
        }
    }
}
