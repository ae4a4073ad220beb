use rand::Rng;
use std::io::{self, Write};

/// Topology written by `write_xor_samples`.
pub const XOR_TOPOLOGY: [usize; 3] = [2, 4, 1];

/// Writes `count` random XOR samples in the `TrainingData` format.
///
/// # Examples
/// ```
/// # use scalarnet::data::write_xor_samples;
/// let mut out = Vec::new();
/// write_xor_samples(&mut out, &mut rand::thread_rng(), 4).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("topology: 2 4 1\n"));
/// assert_eq!(text.lines().count(), 9);
/// ```
pub fn write_xor_samples<W, R>(writer: &mut W, rng: &mut R, count: usize) -> io::Result<()>
where
    W: Write + ?Sized,
    R: Rng + ?Sized,
{
    write!(writer, "topology:")?;
    for width in XOR_TOPOLOGY.iter() {
        write!(writer, " {}", width)?;
    }
    writeln!(writer)?;

    for _ in 0..count {
        let a: u8 = rng.gen_range(0..2);
        let b: u8 = rng.gen_range(0..2);
        writeln!(writer, "in: {}.0 {}.0", a, b)?;
        writeln!(writer, "out: {}.0", a ^ b)?;
    }

    writer.flush()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::data::{SampleSource, TrainingData};

    #[test]
    fn samples_are_xor() {
        let mut out = Vec::new();
        write_xor_samples(&mut out, &mut StdRng::seed_from_u64(11), 50).unwrap();

        let mut data = TrainingData::from_reader(out.as_slice()).unwrap();
        assert_eq!(data.topology(), &XOR_TOPOLOGY);

        let mut count = 0;
        while let Some(inputs) = data.next_input_vector().unwrap() {
            let targets = data.next_target_vector().unwrap();
            assert_eq!(inputs.len(), 2);
            assert!(inputs.iter().all(|&x| x == 0.0 || x == 1.0));
            let expected = if inputs[0] != inputs[1] { 1.0 } else { 0.0 };
            assert_eq!(targets, vec![expected]);
            count += 1;
        }
        assert_eq!(count, 50);
    }
}
