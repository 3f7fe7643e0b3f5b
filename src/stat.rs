use std::fs::File;
use std::io::BufWriter;

use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub expanded_nodes: usize,
    pub discovered_nodes: usize,
    pub path_length: usize,
    pub time_us: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Expanded nodes {:?} Discovered nodes {:?} Path length {:?} Time(microseconds) {:?}",
            self.expanded_nodes, self.discovered_nodes, self.path_length, self.time_us
        );
    }

    pub fn write_json(&self, path: &str) -> anyhow::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
