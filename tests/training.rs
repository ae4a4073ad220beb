use std::fs;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use scalarnet::data::{write_xor_samples, SampleSource, TrainingData, XOR_TOPOLOGY};
use scalarnet::feedforward::{NetConfig, Network, TrainError};

#[test]
fn trains_on_generated_samples() {
    let mut text = Vec::new();
    write_xor_samples(&mut text, &mut StdRng::seed_from_u64(5), 2001).unwrap();
    let mut data = TrainingData::from_reader(text.as_slice()).unwrap();

    let mut rng = StdRng::seed_from_u64(6);
    let net = Network::with_rng(data.topology(), NetConfig::default(), &mut rng).unwrap();
    let mut trainer = net.build_trainer();

    let mut last = None;
    let passes = trainer
        .train_from(&mut data, |report| {
            assert_eq!(report.inputs.len(), 2);
            assert_eq!(report.outputs.len(), 1);
            assert!(report.outputs.iter().all(|o| o.abs() <= 1.0));
            last = Some(report.clone());
        })
        .unwrap();

    assert_eq!(passes, 2001);
    let last = last.unwrap();
    assert_eq!(last.pass, 2001);

    let net = trainer.teardown();
    assert_eq!(net.topology(), &XOR_TOPOLOGY);
    assert_relative_eq!(net.recent_average_error(), last.recent_average_error);
    for layer in net.layers() {
        assert_eq!(layer.bias().activation(), 1.0);
    }
}

#[test]
fn truncated_last_line_stops_quietly() {
    let text = "topology: 2 2 1\n\
                in: 1.0 0.0\n\
                out: 1.0\n\
                in: 0.0 1.0\n\
                out: 1.0\n\
                in: 1.0\n";
    let mut data = TrainingData::from_reader(text.as_bytes()).unwrap();
    let mut trainer = Network::new(data.topology(), NetConfig::default())
        .unwrap()
        .build_trainer();

    let passes = trainer.train_from(&mut data, |_| {}).unwrap();

    assert_eq!(passes, 2);
}

#[test]
fn wrong_target_width_is_an_error() {
    let text = "topology: 1 1\nin: 1.0\nout: 1.0 0.0\n";
    let mut data = TrainingData::from_reader(text.as_bytes()).unwrap();
    let mut trainer = Network::new(data.topology(), NetConfig::default())
        .unwrap()
        .build_trainer();

    let result = trainer.train_from(&mut data, |_| {});

    assert!(matches!(result, Err(TrainError::Backward(_))));
}

#[test]
fn reads_sample_file() {
    let path = std::env::temp_dir().join(format!("scalarnet-{}.txt", std::process::id()));
    let mut file = fs::File::create(&path).unwrap();
    write_xor_samples(&mut file, &mut StdRng::seed_from_u64(8), 10).unwrap();
    drop(file);

    let mut data = TrainingData::open(&path).unwrap();
    let mut trainer = Network::new(data.topology(), NetConfig::default())
        .unwrap()
        .build_trainer();
    let passes = trainer.train_from(&mut data, |_| {}).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(passes, 10);
}
