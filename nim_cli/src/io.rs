use std::{
    fmt::{self, Display},
    fs::File,
    io::{self, Stderr, Stdout, Write},
    path::PathBuf,
};

/// Stream that `-` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

/// Output path given on the command line, `-` stands for a standard stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPath {
    File(PathBuf),
    Std,
}

impl Display for OutputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Std => write!(f, "-"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<String> for OutputPath {
    fn from(value: String) -> Self {
        if value == "-" {
            Self::Std
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl OutputPath {
    /// Create the file (truncating it) or grab the standard stream
    pub fn open(&self, std: StdStream) -> io::Result<Output> {
        match (self, std) {
            (Self::File(path), _) => Ok(Output::File(File::create(path)?)),
            (Self::Std, StdStream::Stdout) => Ok(Output::Stdout(io::stdout())),
            (Self::Std, StdStream::Stderr) => Ok(Output::Stderr(io::stderr())),
        }
    }
}

pub enum Output {
    File(File),
    Stdout(Stdout),
    Stderr(Stderr),
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::File(f) => f.write(buf),
            Self::Stdout(fd) => fd.lock().write(buf),
            Self::Stderr(fd) => fd.lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File(f) => f.flush(),
            Self::Stdout(fd) => fd.lock().flush(),
            Self::Stderr(fd) => fd.lock().flush(),
        }
    }
}
