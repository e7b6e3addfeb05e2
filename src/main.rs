use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use mnist_backprop::data::mnist;
use mnist_backprop::logging::init_tracing;
use mnist_backprop::{LossType, Result, TrainConfig, Trainer};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LossArg {
    Mse,
    CrossEntropy,
}

impl From<LossArg> for LossType {
    fn from(arg: LossArg) -> Self {
        match arg {
            LossArg::Mse => LossType::Mse,
            LossArg::CrossEntropy => LossType::CrossEntropy,
        }
    }
}

/// Trains a feed-forward network on MNIST with plain backpropagation.
///
/// Values given on the command line override those read from `--config`.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// JSON file with a training configuration
    #[arg(long)]
    config: Option<String>,

    /// Directory holding the four MNIST IDX files
    #[arg(long)]
    data_dir: Option<String>,

    /// Epochs to run
    #[arg(long)]
    epochs: Option<usize>,

    /// Size of each training batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Learning rate
    #[arg(long)]
    lr: Option<f64>,

    /// Iterations per epoch (default: dataset size / batch size)
    #[arg(long)]
    iterations: Option<usize>,

    /// Linear layers in the network
    #[arg(long)]
    layers: Option<usize>,

    /// Features in each hidden layer
    #[arg(long)]
    hidden: Option<usize>,

    /// Number of test samples
    #[arg(long)]
    test_batch: Option<usize>,

    #[arg(long, value_enum)]
    loss: Option<LossArg>,

    /// Add uniform noise to pixels before scaling
    #[arg(long)]
    dequantize: bool,

    /// Seed for parameter initialization and batch sampling
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<TrainConfig> {
        let mut config = match &self.config {
            Some(path) => TrainConfig::load_json(path)?,
            None => TrainConfig::default(),
        };
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(lr) = self.lr {
            config.learning_rate = lr;
        }
        if self.iterations.is_some() {
            config.iterations = self.iterations;
        }
        if let Some(layers) = self.layers {
            config.num_layers = layers;
        }
        if let Some(hidden) = self.hidden {
            config.hidden_width = hidden;
        }
        if let Some(test_batch) = self.test_batch {
            config.test_batch_size = test_batch;
        }
        if let Some(loss) = self.loss {
            config.loss = loss.into();
        }
        if self.dequantize {
            config.dequantize = true;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;
    let (train, test) = mnist::load(&config.data_dir)?;

    let input_width = train.item_dims().iter().product();
    let classes = train.classes();
    let mut trainer = Trainer::from_config(config, input_width, classes)?;

    let report = trainer.run(&train, &test, |stats| println!("{stats}"))?;
    println!("test {}", report.test);
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
