use {
    anyhow::{Result, bail},
    clap::Parser,
    itertools::Itertools,
    libordvec::FlatMultiMap,
    std::path::PathBuf,
};

#[derive(Parser, Debug)]
pub struct Opts {
    /// the file to read (defaults to stdin); each non-empty line is a key and a value
    file: Option<PathBuf>,
}

fn parse(text: &str) -> Result<Vec<(String, String)>> {
    let mut entries = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(char::is_whitespace) else {
            bail!("Line {} has a key but no value", number + 1);
        };
        entries.push((key.to_owned(), value.trim_start().to_owned()));
    }
    Ok(entries)
}

pub fn run(opts: Opts) -> Result<()> {
    let text = crate::input::read(opts.file.as_deref())?;
    let groups: FlatMultiMap<String, String> = parse(&text)?.into_iter().collect();

    for key in groups.keys().dedup() {
        let values = groups.get_all(key).iter().map(|(_, v)| v).join(", ");
        println!("{key}: {values}");
    }
    Ok(())
}
