use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::{error, fmt};

/// Supplier of training samples for `Trainer::train_from`.
///
/// [`Trainer::train_from`]: crate::feedforward::Trainer::train_from
pub trait SampleSource {
    /// Number of units in each layer, bias units excluded.
    fn topology(&self) -> &[usize];

    /// Next input vector, or `Ok(None)` once there is no more data.
    fn next_input_vector(&mut self) -> Result<Option<Vec<f64>>, LoadError>;

    /// Target vector belonging to the last input vector.
    fn next_target_vector(&mut self) -> Result<Vec<f64>, LoadError>;
}

/// Line-oriented training data reader.
///
/// The expected format is:
/// ```text
/// topology: 2 4 1
/// in: 1.0 0.0
/// out: 1.0
/// in: 1.0 1.0
/// out: 0.0
/// ```
/// The topology line is read when the reader is created, `in:`/`out:` lines on demand.
pub struct TrainingData<R> {
    reader: R,
    topology: Vec<usize>,
    line: String,
}

impl TrainingData<BufReader<File>> {
    /// Opens a training data file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        TrainingData::from_reader(BufReader::new(file))
    }
}

impl<R: BufRead> TrainingData<R> {
    /// Reads the topology line from `reader`.
    ///
    /// # Returns
    /// * `Ok(TrainingData)` if the first line is `topology:` followed by unsigned integers;
    /// * `Err(LoadError)` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use scalarnet::data::{SampleSource, TrainingData};
    /// let text = "topology: 2 1\nin: 1.0 0.0\nout: 1.0\n";
    /// let mut data = TrainingData::from_reader(text.as_bytes()).unwrap();
    /// assert_eq!(data.topology(), &[2, 1]);
    /// assert_eq!(data.next_input_vector().unwrap(), Some(vec![1.0, 0.0]));
    /// assert_eq!(data.next_target_vector().unwrap(), vec![1.0]);
    /// assert_eq!(data.next_input_vector().unwrap(), None);
    /// ```
    pub fn from_reader(mut reader: R) -> Result<Self, LoadError> {
        let mut line = String::new();
        reader.read_line(&mut line)?;

        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("topology:") {
            return Err(LoadError::MissingTopology);
        }

        let topology = tokens
            .map(|token| {
                token
                    .parse::<usize>()
                    .map_err(|_| LoadError::BadTopology(token.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TrainingData {
            reader,
            topology,
            line,
        })
    }

    /// Reads the next line.
    ///
    /// # Returns
    /// * `None` at end of data (end of file or a blank line);
    /// * values following `label`, up to the first token that is not a number;
    /// * an empty vector if the line has another label.
    fn read_labelled(&mut self, label: &str) -> Result<Option<Vec<f64>>, LoadError> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }

        let mut tokens = self.line.split_whitespace();
        match tokens.next() {
            None => Ok(None),
            Some(found) if found == label => Ok(Some(
                tokens.map_while(|token| token.parse::<f64>().ok()).collect(),
            )),
            Some(_) => Ok(Some(Vec::new())),
        }
    }
}

impl<R: BufRead> SampleSource for TrainingData<R> {
    fn topology(&self) -> &[usize] {
        &self.topology
    }

    fn next_input_vector(&mut self) -> Result<Option<Vec<f64>>, LoadError> {
        self.read_labelled("in:")
    }

    fn next_target_vector(&mut self) -> Result<Vec<f64>, LoadError> {
        Ok(self.read_labelled("out:")?.unwrap_or_default())
    }
}

/// An error while reading training data.
#[derive(Debug)]
pub enum LoadError {
    /// An error while reading from the underlying file or stream.
    Io(io::Error),
    /// The first line does not start with `topology:`.
    MissingTopology,
    /// A layer width on the topology line is not an unsigned integer. Contains the token.
    BadTopology(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {}", e),
            Self::MissingTopology => write!(f, "training data must start with a topology line"),
            Self::BadTopology(token) => write!(f, "invalid layer width {:?}", token),
        }
    }
}

impl error::Error for LoadError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> TrainingData<&[u8]> {
        TrainingData::from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn reads_pairs() {
        let mut data = load("topology: 2 4 1\nin: 0.0 1.0\nout: 1.0\nin: 1.0 1.0\nout: 0.0\n");

        assert_eq!(data.topology(), &[2, 4, 1]);
        assert_eq!(data.next_input_vector().unwrap(), Some(vec![0.0, 1.0]));
        assert_eq!(data.next_target_vector().unwrap(), vec![1.0]);
        assert_eq!(data.next_input_vector().unwrap(), Some(vec![1.0, 1.0]));
        assert_eq!(data.next_target_vector().unwrap(), vec![0.0]);
        assert_eq!(data.next_input_vector().unwrap(), None);
        assert_eq!(data.next_target_vector().unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn missing_trailing_newline() {
        let mut data = load("topology: 1 1\nin: 0.5\nout: -0.5");

        assert_eq!(data.next_input_vector().unwrap(), Some(vec![0.5]));
        assert_eq!(data.next_target_vector().unwrap(), vec![-0.5]);
        assert_eq!(data.next_input_vector().unwrap(), None);
    }

    #[test]
    fn values_stop_at_garbage() {
        let mut data = load("topology: 3 1\nin: 1.0 x 2.0\n");

        assert_eq!(data.next_input_vector().unwrap(), Some(vec![1.0]));
    }

    #[test]
    fn wrong_label_yields_empty_vector() {
        let mut data = load("topology: 1 1\nout: 1.0\n");

        assert_eq!(data.next_input_vector().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn blank_line_ends_data() {
        let mut data = load("topology: 1 1\n\nin: 1.0\n");

        assert_eq!(data.next_input_vector().unwrap(), None);
    }

    #[test]
    fn bad_header() {
        for text in ["", "in: 1.0\n", "topo: 2 1\n"] {
            match TrainingData::from_reader(text.as_bytes()) {
                Err(LoadError::MissingTopology) => {}
                other => panic!("unexpected result for {:?}: {:?}", text, other.err()),
            }
        }

        match TrainingData::from_reader("topology: 2 1.5\n".as_bytes()) {
            Err(LoadError::BadTopology(token)) => assert_eq!(token, "1.5"),
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }

    #[test]
    fn missing_file() {
        let result = TrainingData::open("/nonexistent/scalarnet/training.txt");

        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
