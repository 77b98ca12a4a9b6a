use fmcwcore::prelude::Complex32;
use fmcwcore::processing::{
    angle_beamform, angle_monopulse, find_peaks, DopplerProcessor, MtiFilter, PeakSearchOptions,
    RangeProcessor, SteeringMatrix, Window, WindowKind,
};
use ndarray::Array2;
use std::f32::consts::{FRAC_PI_2, PI};

const SAMPLES: usize = 64;
const CHIRPS: usize = 16;
const ANTENNAS: usize = 4;
const RANGE_BIN: usize = 10;
const DOPPLER_BIN: usize = 3;
const ARRIVAL: f32 = 0.25;

/// Half-wavelength array: consecutive antennas differ by `pi * sin(theta)`.
fn antenna_frame(antenna: usize) -> Array2<f32> {
    let spatial = PI * ARRIVAL.sin() * antenna as f32;
    Array2::from_shape_fn((CHIRPS, SAMPLES), |(c, n)| {
        let fast = 2.0 * PI * (RANGE_BIN * n) as f32 / SAMPLES as f32;
        let slow = 2.0 * PI * (DOPPLER_BIN * c) as f32 / CHIRPS as f32;
        (fast + slow + spatial).cos() + 0.5
    })
}

fn strongest_peak(profile: &[f32]) -> Option<usize> {
    let max = profile.iter().cloned().fold(f32::MIN, f32::max);
    let options = PeakSearchOptions {
        height: 0.5 * max,
        ..Default::default()
    };
    let mut peaks = [0; 4];
    let count = find_peaks(profile, Some(&options), &mut peaks);
    (count == 1).then(|| peaks[0])
}

#[test]
fn synthetic_target_is_found_in_range_doppler_and_angle() {
    let window = Window::generate(WindowKind::Hann, SAMPLES).unwrap();
    let mut range_stage = RangeProcessor::new();
    let mut doppler_stage = DopplerProcessor::new();

    let mut maps = Vec::new();
    for antenna in 0..ANTENNAS {
        let mut frame = antenna_frame(antenna);
        let mut range = Array2::zeros((CHIRPS, SAMPLES / 2));
        range_stage
            .range_fft(frame.view_mut(), range.view_mut(), true, Some(window.as_slice()))
            .unwrap();

        let mut doppler = Array2::zeros((SAMPLES / 2, CHIRPS));
        doppler_stage
            .doppler_cfft(range.view(), doppler.view_mut(), false, None)
            .unwrap();
        maps.push(doppler);
    }
    assert_eq!(range_stage.backend().plan_rebuilds(), 1);
    assert_eq!(doppler_stage.backend().plan_rebuilds(), 1);

    let range_profile: Vec<f32> = maps[0].column(DOPPLER_BIN).iter().map(|v| v.norm()).collect();
    assert_eq!(strongest_peak(&range_profile), Some(RANGE_BIN));

    let doppler_profile: Vec<f32> = maps[0].row(RANGE_BIN).iter().map(|v| v.norm()).collect();
    assert_eq!(strongest_peak(&doppler_profile), Some(DOPPLER_BIN));

    let cell = |antenna: usize| maps[antenna][[RANGE_BIN, DOPPLER_BIN]];
    let mut monopulse = [0.0];
    angle_monopulse(&[cell(1)], &[cell(0)], 2.0, 1.0, &mut monopulse).unwrap();
    assert!((monopulse[0] - ARRIVAL).abs() < 1e-3, "monopulse {}", monopulse[0]);

    let steering = SteeringMatrix::generate(FRAC_PI_2, 181, 1.0, 2.0, ANTENNAS);
    let input = Array2::from_shape_fn((ANTENNAS, 1), |(a, _)| cell(a));
    let mut beams = Array2::<Complex32>::zeros((steering.num_angles(), 1));
    angle_beamform(input.view(), steering.weights(), beams.view_mut()).unwrap();

    let power: Vec<f32> = beams.column(0).iter().map(|v| v.norm()).collect();
    let best = strongest_peak(&power).expect("one beam peak");
    assert!((steering.angles()[best] - ARRIVAL).abs() <= PI / 180.0);
}

#[test]
fn mti_suppresses_repeated_range_profile() {
    let window = Window::generate(WindowKind::Hamming, SAMPLES).unwrap();
    let mut stage = RangeProcessor::new();
    let mut mti = MtiFilter::new(0.5, SAMPLES / 2);
    let mut output = vec![0.0; SAMPLES / 2];

    let mut peak_after = Vec::new();
    for _ in 0..12 {
        let mut frame = antenna_frame(0);
        let mut range = Array2::zeros((CHIRPS, SAMPLES / 2));
        stage
            .range_fft(frame.view_mut(), range.view_mut(), true, Some(window.as_slice()))
            .unwrap();
        let profile: Vec<f32> = range.row(0).iter().map(|v| v.norm()).collect();
        mti.apply(&profile, &mut output);
        peak_after.push(output[RANGE_BIN].abs());
    }

    assert!(peak_after[0] > 1.0);
    assert!(peak_after[11] < peak_after[0] * 1e-3);
}
