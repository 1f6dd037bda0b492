use rand::distributions::Alphanumeric;
use rand::Rng;

/// Name for a temporary object file. Objects are written under a temp name
/// and renamed into place so readers never observe a partial file.
pub fn tmp_file_name() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("tmp_obj_{suffix}")
}
