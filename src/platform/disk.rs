use std::path::{Path, PathBuf};
use sysinfo::Disks;

/// Free bytes on the disk whose mount point is the longest prefix of `path`
pub fn available_space(path: &Path) -> Option<u64> {
    let target = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());

    let disks = Disks::new_with_refreshed_list();
    let mounts = disks
        .list()
        .iter()
        .map(|disk| (disk.mount_point().to_path_buf(), disk.available_space()));

    pick_disk(&target, mounts)
}

fn pick_disk(target: &Path, mounts: impl Iterator<Item = (PathBuf, u64)>) -> Option<u64> {
    mounts
        .filter(|(mount, _)| target.starts_with(mount))
        .max_by_key(|(mount, _)| mount.components().count())
        .map(|(_, available)| available)
}

/// Bytes to gigabytes (GiB)
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}
