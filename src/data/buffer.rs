use ndarray::{Array2, ArrayD, Axis, IxDyn};
use rand::Rng;

use crate::data::idx::IdxArray;
use crate::error::{NetError, Result};

/// One mini-batch: raw inputs `[batch, item_dims...]` and one-hot labels
/// `[batch, classes]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub inputs: ArrayD<f64>,
    pub labels: Array2<f64>,
}

impl Batch {
    pub fn new(inputs: ArrayD<f64>, labels: Array2<f64>) -> Result<Batch> {
        let n = inputs.shape().first().copied().unwrap_or(0);
        if n != labels.nrows() {
            return Err(NetError::shape("batch", &[labels.nrows()], &[n]));
        }
        Ok(Batch { inputs, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-memory dataset that hands out uniformly sampled mini-batches.
///
/// Sampling is with replacement, so a run of `len() / batch_size` draws is not
/// guaranteed to visit every item.
#[derive(Debug, Clone)]
pub struct Buffer {
    pixels: Vec<u8>,
    item_dims: Vec<usize>,
    labels: Array2<f64>,
}

impl Buffer {
    /// `pixels` holds `labels.nrows()` items of `product(item_dims)` bytes each.
    pub fn new(pixels: Vec<u8>, item_dims: Vec<usize>, labels: Array2<f64>) -> Result<Buffer> {
        let item_size: usize = item_dims.iter().product();
        if pixels.len() != labels.nrows() * item_size {
            return Err(NetError::shape(
                "buffer inputs",
                &[labels.nrows() * item_size],
                &[pixels.len()],
            ));
        }
        Ok(Buffer {
            pixels,
            item_dims,
            labels,
        })
    }

    /// Pairs an IDX image file with an IDX label file, one-hot encoding the
    /// labels over `classes` categories.
    pub fn from_idx(images: IdxArray, labels: IdxArray, classes: usize) -> Result<Buffer> {
        if labels.item_size() != 1 {
            return Err(NetError::Idx(format!(
                "label file must be one-dimensional, got dims {:?}",
                labels.dims()
            )));
        }
        if images.len() != labels.len() {
            return Err(NetError::Idx(format!(
                "image file declares {} items but label file declares {}",
                images.len(),
                labels.len()
            )));
        }
        let one_hot = one_hot(labels.data(), classes)?;
        let item_dims = images.item_dims().to_vec();
        Buffer::new(images.into_data(), item_dims, one_hot)
    }

    pub fn len(&self) -> usize {
        self.labels.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape of one item, e.g. `[28, 28]`.
    pub fn item_dims(&self) -> &[usize] {
        &self.item_dims
    }

    pub fn classes(&self) -> usize {
        self.labels.ncols()
    }

    /// Draws `batch_size` items uniformly at random, with replacement.
    pub fn draw<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Result<Batch> {
        if batch_size == 0 {
            return Err(NetError::Configuration("batch size must be positive".into()));
        }
        if self.is_empty() {
            return Err(NetError::Configuration("cannot draw from an empty dataset".into()));
        }

        let item_size: usize = self.item_dims.iter().product();
        let indices: Vec<usize> = (0..batch_size).map(|_| rng.gen_range(0..self.len())).collect();

        let mut values = Vec::with_capacity(batch_size * item_size);
        for &i in &indices {
            let item = &self.pixels[i * item_size..(i + 1) * item_size];
            values.extend(item.iter().map(|&p| f64::from(p)));
        }

        let mut shape = Vec::with_capacity(self.item_dims.len() + 1);
        shape.push(batch_size);
        shape.extend_from_slice(&self.item_dims);
        let inputs = ArrayD::from_shape_vec(IxDyn(&shape), values)
            .map_err(|_| NetError::shape("buffer draw", &shape, &[batch_size * item_size]))?;

        Batch::new(inputs, self.labels.select(Axis(0), &indices))
    }
}

/// Expands class indices into one-hot rows of length `classes`.
pub fn one_hot(labels: &[u8], classes: usize) -> Result<Array2<f64>> {
    let mut out = Array2::zeros((labels.len(), classes));
    for (i, &label) in labels.iter().enumerate() {
        let class = label as usize;
        if class >= classes {
            return Err(NetError::Idx(format!(
                "label at index {i}: class {class} is out of range for {classes} classes"
            )));
        }
        out[[i, class]] = 1.0;
    }
    Ok(out)
}
