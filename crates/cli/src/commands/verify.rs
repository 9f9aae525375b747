use ctxsnap::SnapshotInspector;
use ctxsnap::StatusSink;
use std::path::Path;

/// Fails when the stored checksum does not match the payload.
pub fn run(inspector: &SnapshotInspector, snapshot_path: &Path, sink: &mut dyn StatusSink) -> anyhow::Result<()> {
    let verification = inspector.verify_path(snapshot_path, sink)?;

    if verification.is_match() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "Checksum mismatch: stored {}, computed {}",
            verification.stored,
            verification.computed
        ))
    }
}
