use candle_core::{DType, Device, Tensor};
use sitechat_embed::masked_mean_l2;

#[test]
fn masked_mean_l2_ignores_padding() {
    let dev = Device::Cpu;
    // Two tokens with hidden dim 4; second token is padding.
    let h = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], (1, 2, 4), &dev).unwrap();
    let mask = Tensor::from_slice(&[1u32, 0], (1, 2), &dev).unwrap();
    let out = masked_mean_l2(&h, &mask).unwrap();
    let v: Vec<Vec<f32>> = out.to_vec2().unwrap();

    let norm: f32 = (1.0f32 + 4.0 + 9.0 + 16.0).sqrt();
    let expected = [1.0 / norm, 2.0 / norm, 3.0 / norm, 4.0 / norm];
    for (a, b) in v[0].iter().copied().zip(expected) {
        assert!((a - b).abs() < 1e-5, "a={a} b={b}");
    }
}

#[test]
fn masked_mean_l2_handles_rows_of_different_lengths() {
    let dev = Device::Cpu;
    let h = Tensor::from_slice(
        &[
            3.0f32, 0.0, 0.0, 0.0, // row 0, token 0
            0.0, 4.0, 9.0, 9.0, // row 0, token 1 (padding)
            1.0, 1.0, 3.0, 3.0, // row 1, token 0
            1.0, 1.0, 5.0, 5.0, // row 1, token 1
        ],
        (2, 2, 4),
        &dev,
    )
    .unwrap();
    let mask = Tensor::from_slice(&[1i64, 0, 1, 1], (2, 2), &dev).unwrap().to_dtype(DType::F32).unwrap();
    let v: Vec<Vec<f32>> = masked_mean_l2(&h, &mask).unwrap().to_vec2().unwrap();

    assert_eq!(v.len(), 2);
    assert!((v[0][0] - 1.0).abs() < 1e-5 && v[0][1].abs() < 1e-5);
    // Row 1 mean is [1, 1, 4, 4] with norm sqrt(34).
    let n = 34f32.sqrt();
    for (a, b) in v[1].iter().copied().zip([1.0 / n, 1.0 / n, 4.0 / n, 4.0 / n]) {
        assert!((a - b).abs() < 1e-5, "a={a} b={b}");
    }
}

#[test]
fn masked_mean_l2_rejects_mismatched_mask() {
    let dev = Device::Cpu;
    let h = Tensor::zeros((1, 3, 4), DType::F32, &dev).unwrap();
    let mask = Tensor::ones((1, 2), DType::F32, &dev).unwrap();
    assert!(masked_mean_l2(&h, &mask).is_err());
}
