use {
    anyhow::Result,
    clap::{Parser, ValueEnum},
    libordvec::{Compare, FlatMultiSet, FlatSet, Natural, Reversed},
    std::{
        io::{BufWriter, Write},
        path::PathBuf,
    },
};

#[derive(Parser, Debug)]
pub struct Opts {
    /// keep repeated words
    #[arg(short, long)]
    multi: bool,
    /// how to insert the words
    #[arg(short, long, value_enum, default_value_t = Strategy::Bulk)]
    strategy: Strategy,
    /// print in descending order
    #[arg(short, long)]
    reverse: bool,
    /// the file to read (defaults to stdin)
    file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// one word at a time, each with a full binary search
    Single,
    /// one word at a time, each searched for starting from where the previous one went
    Hinted,
    /// all the words at once
    Bulk,
}

// The part of the set and multiset interfaces that we need.
trait Words {
    fn insert(&mut self, word: String) -> usize;
    fn insert_hint(&mut self, hint: usize, word: String) -> usize;
    fn insert_iter(&mut self, words: Vec<String>);
    fn words(&self) -> &[String];
}

impl<C: Compare<String>> Words for FlatSet<String, C> {
    fn insert(&mut self, word: String) -> usize {
        FlatSet::insert(self, word).0
    }

    fn insert_hint(&mut self, hint: usize, word: String) -> usize {
        FlatSet::insert_hint(self, hint, word)
    }

    fn insert_iter(&mut self, words: Vec<String>) {
        FlatSet::insert_iter(self, words);
    }

    fn words(&self) -> &[String] {
        self.as_slice()
    }
}

impl<C: Compare<String>> Words for FlatMultiSet<String, C> {
    fn insert(&mut self, word: String) -> usize {
        FlatMultiSet::insert(self, word)
    }

    fn insert_hint(&mut self, hint: usize, word: String) -> usize {
        FlatMultiSet::insert_hint(self, hint, word)
    }

    fn insert_iter(&mut self, words: Vec<String>) {
        FlatMultiSet::insert_iter(self, words);
    }

    fn words(&self) -> &[String] {
        self.as_slice()
    }
}

fn container(multi: bool, reverse: bool) -> Box<dyn Words> {
    match (multi, reverse) {
        (false, false) => Box::new(FlatSet::<String, _>::with_comparator(Natural)),
        (false, true) => Box::new(FlatSet::<String, _>::with_comparator(Reversed(Natural))),
        (true, false) => Box::new(FlatMultiSet::<String, _>::with_comparator(Natural)),
        (true, true) => Box::new(FlatMultiSet::<String, _>::with_comparator(Reversed(Natural))),
    }
}

fn fill(words: &mut dyn Words, input: Vec<String>, strategy: Strategy) {
    match strategy {
        Strategy::Single => {
            for word in input {
                words.insert(word);
            }
        }
        Strategy::Hinted => {
            // Mostly-sorted input is the common case, and then the next word usually goes right
            // after the previous one.
            let mut hint = 0;
            for word in input {
                hint = words.insert_hint(hint, word) + 1;
            }
        }
        Strategy::Bulk => words.insert_iter(input),
    }
}

pub fn run(opts: Opts) -> Result<()> {
    let input = crate::input::words(opts.file.as_deref())?;
    debug!("inserting with strategy {:?}", opts.strategy);

    let mut words = container(opts.multi, opts.reverse);
    fill(words.as_mut(), input, opts.strategy);

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for word in words.words() {
        writeln!(out, "{word}")?;
    }
    out.flush()?;
    Ok(())
}
