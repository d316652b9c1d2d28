use std::collections::BTreeSet;
use std::io;

use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct WalkConfig {
    pub rs: String,
    pub dir: String,
    pub suffixes: Vec<String>,
}

/// Fails when the files under `config.dir` no longer match the ones seen
/// when the test was expanded.
pub fn check(config: &WalkConfig, expected_file_names: Vec<String>) {
    check_files(config, expected_file_names).unwrap_or_else(|e| panic!("{}", e));
}

fn check_files(config: &WalkConfig, expected_file_names: Vec<String>) -> io::Result<()> {
    let expected_file_names = expected_file_names.into_iter().collect::<BTreeSet<_>>();
    let mut file_names = BTreeSet::new();
    for entry in WalkDir::new(&config.dir).sort_by_file_name() {
        let entry = entry?;
        let file_name = entry
            .path()
            .strip_prefix(&config.dir)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
            .to_str()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Non-UTF8 file name"))?;
        if config.suffixes.iter().any(|suffix| file_name.ends_with(suffix)) {
            file_names.insert(file_name.to_owned());
        }
    }
    if expected_file_names == file_names {
        return Ok(());
    }

    // Touching the test file makes cargo expand the test again.
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    utime::set_file_times(&config.rs, now as i64, now as i64)?;

    let missing = expected_file_names.difference(&file_names).collect::<Vec<_>>();
    let extra = file_names.difference(&expected_file_names).collect::<Vec<_>>();
    panic!(
        "Changes detected in testcases. Please rerun the test.\n  missing: {:?}\n  extra: {:?}",
        missing, extra
    )
}
