use ctxsnap::{Repair, SnapshotInspector, StatusSink};
use std::path::Path;

pub fn run(inspector: &SnapshotInspector, snapshot_path: &Path, sink: &mut dyn StatusSink) -> anyhow::Result<Repair> {
    Ok(inspector.repair_path(snapshot_path, sink)?)
}
