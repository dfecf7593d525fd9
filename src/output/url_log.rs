use std::fs;
use std::io;
use std::path::Path;

/// Writes `urls` one per line, sorted and deduplicated
///
/// Returns the number of lines written.
pub fn write_url_log<'a, I>(path: &Path, urls: I) -> io::Result<usize>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut urls: Vec<&String> = urls.into_iter().collect();
    urls.sort();
    urls.dedup();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut text = String::new();
    for url in &urls {
        text.push_str(url);
        text.push('\n');
    }
    fs::write(path, text)?;

    tracing::info!("Recorded {} URLs in {}", urls.len(), path.display());
    Ok(urls.len())
}

/// Like [`write_url_log`], but only when there is something to record
///
/// An empty set removes a log left over from an earlier run, so the file on
/// disk always describes the latest run.
pub fn write_url_log_if_any<'a, I>(path: &Path, urls: I) -> io::Result<usize>
where
    I: IntoIterator<Item = &'a String>,
{
    let urls: Vec<&String> = urls.into_iter().collect();
    if !urls.is_empty() {
        return write_url_log(path, urls);
    }

    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Removed stale {}", path.display());
            Ok(0)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e),
    }
}
