use {anyhow::Result, clap::Parser, libordvec::FlatMap, std::path::PathBuf};

#[derive(Parser, Debug)]
pub struct Opts {
    /// the file to read (defaults to stdin)
    file: Option<PathBuf>,
}

pub fn run(opts: Opts) -> Result<()> {
    let mut tally = FlatMap::<String, usize>::new();
    for word in crate::input::words(opts.file.as_deref())? {
        *tally.get_or_insert_default(word) += 1;
    }
    debug!("{} distinct words", tally.len());

    for (word, count) in &tally {
        println!("{word} {count}");
    }
    Ok(())
}
