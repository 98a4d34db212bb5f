//! Init command implementation

use std::path::Path;

use colored::Colorize;

use cadsync_fs::{NormalizedPath, io};

use crate::error::{CliError, Result};

const STARTER: &str = r#"# cadsync project file
#
# Entries below are kept in sync with the drawing. cadsync adds a `_sync`
# block to each entry after its first run; do not edit it by hand.

settings:
  drawing: {drawing}
  # script_id: CADSYNC
  # conflict_policy: skip        # yaml_wins | drawing_wins | skip
  # geometry_dir: geometry       # resolved geometry payloads, <layer>.json
  # text_sync: auto              # push | auto | pull | skip
  # block_sync: auto
  # viewport_sync: auto
  # geometry_sync: push
  # default_layers: { text: TEXT, block: BLOCKS, viewport: VIEWPORTS }
  discovery:
    enabled: true
    layers: []                   # empty scans every layer

styles: {}
#  title: { color: 1, text_style: STANDARD, layer: TITLE }

texts: []
#  - name: Main Title
#    text: Bebauungsplan
#    position: [10, 280]
#    height: 5
#    style: title

blocks: []
#  - name: North Arrow
#    blockName: NORTH
#    position: [400, 280]

viewports: []

geometry_layers: []
#  - name: Parcels
#    layer: PARCELS
"#;

/// Run the init command
///
/// Never overwrites an existing project file.
pub fn run_init(project: &Path, drawing: &str) -> Result<()> {
    let path = NormalizedPath::new(project);
    if path.exists() {
        return Err(CliError::user(format!("{} already exists", path)));
    }

    let content = STARTER.replace("{drawing}", drawing);
    io::write_text(&path, &content)?;
    tracing::info!(path = %path, drawing, "created project file");

    println!("{} Created {}", "OK".green().bold(), path.as_str().cyan());
    println!("Add entries, then run {}.", "cadsync sync".cyan());
    Ok(())
}
