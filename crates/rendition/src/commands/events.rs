//! Events command implementation

use anyhow::Result;
use rendition_blocks::{BlockArena, EventRecorder};

use super::read_document;

pub fn execute(input: &str) -> Result<()> {
    let document = read_document(input)?;
    let mut arena = BlockArena::new();
    let root = arena.insert_fragment(&document);

    let mut recorder = EventRecorder::new();
    arena.traverse(root, &mut recorder);
    print!("{recorder}");
    Ok(())
}
