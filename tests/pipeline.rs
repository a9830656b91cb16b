use std::{fs::File, io::BufWriter, path::Path};

use anyhow::Result;
use float_cmp::approx_eq;
use thermal_map::{
    detect_bit_depth, Analysis, AnalysisSettings, BitDepth, CsvSink, Error, ReadingLog,
    TemperatureBounds,
};

fn write_gray16_png(path: &Path, width: u32, height: u32, samples: &[u16]) -> Result<()> {
    let mut encoder = png::Encoder::new(BufWriter::new(File::create(path)?), width, height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Sixteen);
    let mut writer = encoder.write_header()?;
    let bytes: Vec<u8> = samples.iter().flat_map(|v| v.to_be_bytes().to_vec()).collect();
    writer.write_image_data(&bytes)?;
    Ok(())
}

#[test]
fn sixteen_bit_png_end_to_end() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("capture.png");
    write_gray16_png(&input, 3, 1, &[1000, 3000, 5000])?;

    assert_eq!(detect_bit_depth(&input)?, BitDepth::SixteenBit);

    let settings = AnalysisSettings::default().with_bounds(Some(0.), Some(600.));
    let analysis = Analysis::from_path(&input, &settings)?;
    assert_eq!(analysis.normalized().grid().row(0).to_vec(), vec![0, 128, 255]);

    let mut log = ReadingLog::new();
    let middle = analysis.sample(&mut log, 1, 0)?.temperature();
    assert!(approx_eq!(f64, middle, 301.1764705882353, epsilon = 1e-9));
    analysis.sample(&mut log, 0, 0)?;
    analysis.sample(&mut log, 2, 0)?;
    assert_eq!(log.len(), 3);

    let mut sink = CsvSink::new(vec![]);
    log.export(&mut sink)?;
    let csv = String::from_utf8(sink.into_inner()?)?;
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[0], "timestamp,x,y,temperature_celsius");
    assert_eq!(lines.len(), 4);
    assert!(lines[2].ends_with(",0,0,0.0"), "{}", lines[2]);
    assert!(lines[3].ends_with(",2,0,600.0"), "{}", lines[3]);

    let out = analysis.save(dir.path(), "capture")?;
    assert!(out.normalized.exists());
    assert!(out.colorized.exists());
    assert_eq!(detect_bit_depth(&out.normalized)?, BitDepth::EightBit);
    Ok(())
}

#[test]
fn flat_sixteen_bit_is_mid_gray() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("flat.png");
    write_gray16_png(&input, 2, 2, &[777; 4])?;

    let analysis = Analysis::from_path(&input, &AnalysisSettings::default())?;
    assert!(analysis.normalized().grid().iter().all(|&v| v == 128));
    let bounds = TemperatureBounds::default();
    assert_eq!(analysis.average_temperature(), Some(bounds.temperature_of(128)));
    Ok(())
}

#[test]
fn eight_bit_passes_through() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("gray8.png");
    let pixels = vec![5u8, 60, 200, 250];
    image::GrayImage::from_raw(2, 2, pixels.clone())
        .unwrap()
        .save(&input)?;

    let analysis = Analysis::from_path(&input, &AnalysisSettings::default())?;
    assert_eq!(analysis.bit_depth(), BitDepth::EightBit);
    assert_eq!(analysis.normalized().grid().iter().copied().collect::<Vec<_>>(), pixels);
    Ok(())
}

#[test]
fn undecodable_file_is_unsupported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("notes.png");
    std::fs::write(&input, b"not really a png")?;

    let err = Analysis::from_path(&input, &AnalysisSettings::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::UnsupportedFormat(_))
    ));
    Ok(())
}
