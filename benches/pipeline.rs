use criterion::*;
use ndarray::Array2;
use thermal_map::{
    colormap::colorize,
    normalize::{normalize_u16, NormalizedImage},
    Analysis, AnalysisSettings, SourceImage,
};

/// A smooth 16-bit frame with a hot spot, roughly what a
/// 640x512 radiometric sensor produces.
fn synthetic_frame(height: usize, width: usize) -> Array2<u16> {
    let (cy, cx) = (height as f64 / 2., width as f64 / 3.);
    Array2::from_shape_fn((height, width), |(r, c)| {
        let d2 = (r as f64 - cy).powi(2) + (c as f64 - cx).powi(2);
        (7000. + 9000. * (-d2 / 5000.).exp() + (c % 7) as f64) as u16
    })
}

fn pipeline(c: &mut Criterion) {
    let frame = synthetic_frame(512, 640);

    c.bench_function("normalize_u16", |b| b.iter(|| normalize_u16(black_box(&frame))));

    let normalized = NormalizedImage(normalize_u16(&frame));
    c.bench_function("colorize", |b| b.iter(|| colorize(black_box(&normalized))));

    let source = SourceImage::SixteenBit(frame.clone());
    let plain = AnalysisSettings::default();
    c.bench_function("analysis", |b| {
        b.iter(|| Analysis::from_source(black_box(&source), &plain))
    });

    let mut enhanced = AnalysisSettings::default();
    enhanced.enhance.enabled = true;
    c.bench_function("analysis_enhanced", |b| {
        b.iter(|| Analysis::from_source(black_box(&source), &enhanced))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = pipeline
}

criterion_main!(benches);
