use {
    anyhow::{Context, Result},
    std::{io::Read, path::Path},
};

/// Reads the whole input, from `path` if there is one and from stdin otherwise.
pub fn read(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Could not read the file {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Could not read from stdin")?;
            Ok(text)
        }
    }
}

/// The whitespace-separated words of the input.
pub fn words(path: Option<&Path>) -> Result<Vec<String>> {
    let text = read(path)?;
    let words: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
    debug!("read {} words", words.len());
    Ok(words)
}
