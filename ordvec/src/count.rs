use {
    anyhow::Result,
    clap::Parser,
    libordvec::{FlatMultiSet, FlatSet},
    std::path::PathBuf,
};

#[derive(Parser, Debug)]
pub struct Opts {
    /// the word to count
    word: String,
    /// count every occurrence, not just whether there is one
    #[arg(short, long)]
    multi: bool,
    /// the file to read (defaults to stdin)
    file: Option<PathBuf>,
}

pub fn run(opts: Opts) -> Result<()> {
    let input = crate::input::words(opts.file.as_deref())?;
    let count = if opts.multi {
        input.into_iter().collect::<FlatMultiSet<_>>().count(&opts.word)
    } else {
        input.into_iter().collect::<FlatSet<_>>().count(&opts.word)
    };
    println!("{count}");
    Ok(())
}
