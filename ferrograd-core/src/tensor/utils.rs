use crate::error::FerrogradError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

/// Calculates the strides for a given shape.
///
/// Strides represent the number of elements to skip in the flattened data
/// array to move one step along each dimension.
///
/// Example: shape = [2, 3] -> strides = [3, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Determines the output shape resulting from broadcasting two input shapes.
///
/// Follows NumPy/PyTorch broadcasting rules: shorter shapes are padded with
/// leading 1s, and dimensions are compatible when equal or when one of them
/// is 1.
pub fn broadcast_shapes(
    shape_a: &[usize],
    shape_b: &[usize],
) -> Result<Vec<usize>, FerrogradError> {
    let rank_a = shape_a.len();
    let rank_b = shape_b.len();
    let max_rank = rank_a.max(rank_b);
    let mut result = vec![0; max_rank];

    for i in 0..max_rank {
        let dim_a = shape_a.get(rank_a.wrapping_sub(1 + i)).copied().unwrap_or(1);
        let dim_b = shape_b.get(rank_b.wrapping_sub(1 + i)).copied().unwrap_or(1);

        result[max_rank - 1 - i] = if dim_a == dim_b {
            dim_a
        } else if dim_a == 1 {
            dim_b
        } else if dim_b == 1 {
            dim_a
        } else {
            return Err(FerrogradError::BroadcastError {
                shape1: shape_a.to_vec(),
                shape2: shape_b.to_vec(),
            });
        };
    }
    Ok(result)
}

/// Converts a linear index into multi-dimensional coordinates for `shape`.
pub fn index_to_coord(index: usize, strides: &[usize], shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut coord = vec![0; rank];
    let mut rem = index;
    for i in 0..rank {
        if strides[i] > 0 {
            coord[i] = rem / strides[i];
            rem %= strides[i];
        }
    }
    coord
}

/// Maps coordinates in a broadcasted output shape back to the linear index of
/// an original (possibly smaller) input. Dimensions of size 1 in the original
/// always map to coordinate 0.
pub fn coord_to_index_broadcasted(
    target_coord: &[usize],
    original_shape: &[usize],
    original_strides: &[usize],
) -> usize {
    if original_shape.is_empty() {
        return 0; // scalar
    }
    let rank_diff = target_coord.len().saturating_sub(original_shape.len());
    let mut index = 0;
    for i in 0..original_shape.len() {
        let coord = if original_shape[i] == 1 {
            0
        } else {
            target_coord[rank_diff + i]
        };
        index += coord * original_strides[i];
    }
    index
}

/// Applies a binary closure element-wise over two tensors under broadcasting,
/// producing the data buffer of the (already broadcast-resolved) output shape.
pub(crate) fn broadcast_zip<F>(
    a: &TensorData,
    b: &TensorData,
    out_shape: &[usize],
    f: F,
) -> Vec<f32>
where
    F: Fn(f32, f32) -> f32,
{
    let numel: usize = out_shape.iter().product();
    let out_strides = calculate_strides(out_shape);
    let mut out = Vec::with_capacity(numel);
    for i in 0..numel {
        let coords = index_to_coord(i, &out_strides, out_shape);
        let ia = coord_to_index_broadcasted(&coords, &a.shape, &a.strides);
        let ib = coord_to_index_broadcasted(&coords, &b.shape, &b.strides);
        out.push(f(a.data[ia], b.data[ib]));
    }
    out
}

/// Reduces a gradient tensor to match the shape of an original input that was
/// involved in a broadcasting operation.
///
/// When broadcasting occurs during a forward pass (e.g. A[2,3] + B[1,3] ->
/// C[2,3]), the gradient flowing back to an input must have the shape of that
/// input, so the upstream gradient is summed across the broadcasted
/// dimensions.
pub fn reduce_gradient(grad: &Tensor, target_shape: &[usize]) -> Result<Tensor, FerrogradError> {
    let grad_guard = grad.read_data();
    if grad_guard.shape == target_shape {
        drop(grad_guard);
        return Ok(grad.clone());
    }

    let target_strides = calculate_strides(target_shape);
    let target_numel: usize = target_shape.iter().product();
    let mut reduced = vec![0.0f32; target_numel];

    let grad_strides = grad_guard.strides.clone();
    let grad_shape = grad_guard.shape.clone();
    for (i, &g) in grad_guard.data.iter().enumerate() {
        let coords = index_to_coord(i, &grad_strides, &grad_shape);
        let target_index = coord_to_index_broadcasted(&coords, target_shape, &target_strides);
        reduced[target_index] += g;
    }
    drop(grad_guard);

    Tensor::new(reduced, target_shape.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_strides() {
        assert_eq!(calculate_strides(&[2, 3]), vec![3, 1]);
        assert_eq!(calculate_strides(&[2, 2, 2]), vec![4, 2, 1]);
        assert_eq!(calculate_strides(&[]), Vec::<usize>::new());
    }

    #[test]
    fn test_broadcast_shapes_ok() {
        assert_eq!(broadcast_shapes(&[2, 3], &[1, 3]).unwrap(), vec![2, 3]);
        assert_eq!(broadcast_shapes(&[4, 1], &[3]).unwrap(), vec![4, 3]);
        assert_eq!(broadcast_shapes(&[], &[2, 2]).unwrap(), vec![2, 2]);
    }

    #[test]
    fn test_broadcast_shapes_err() {
        let err = broadcast_shapes(&[2, 3], &[2, 4]).unwrap_err();
        assert!(matches!(err, FerrogradError::BroadcastError { .. }));
    }

    #[test]
    fn test_reduce_gradient_sums_broadcast_dims() {
        let grad = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        let reduced = reduce_gradient(&grad, &[1, 3]).unwrap();
        assert_eq!(reduced.shape(), vec![1, 3]);
        assert_eq!(reduced.get_data(), vec![5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_reduce_gradient_to_scalar() {
        let grad = Tensor::new(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
        let reduced = reduce_gradient(&grad, &[]).unwrap();
        assert_eq!(reduced.shape(), Vec::<usize>::new());
        assert_eq!(reduced.get_data(), vec![6.0]);
    }
}
