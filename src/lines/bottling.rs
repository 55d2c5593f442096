//! Nine-machine beverage bottling line with fitted state tables.
//!
//! Every machine starts in state 128 (running). State 0 is a stop, other
//! codes are degraded or waiting modes of the particular machine type.

use crate::core::builder::{BufferSpec, LineConfig, MachineSpec, MachineTypeSpec, StateSpec};
use crate::core::sampler::SamplerSpec;

const STOPPED: SamplerSpec = SamplerSpec::Constant { value: 0.0 };

fn expon(loc: f64, scale: f64) -> SamplerSpec {
    SamplerSpec::Exponential { loc, scale }
}

fn lognorm(s: f64, loc: f64, scale: f64) -> SamplerSpec {
    SamplerSpec::LogNormal { s, loc, scale }
}

fn beta(a: f64, b: f64, loc: f64, scale: f64) -> SamplerSpec {
    SamplerSpec::Beta { a, b, loc, scale }
}

fn depalletizer() -> MachineTypeSpec {
    MachineTypeSpec::new(
        "Depalletizer",
        vec![
            StateSpec::new(
                0,
                &[(128, 0.886), (1024, 0.108), (2048, 0.006)],
                STOPPED,
                expon(1.0, 6.829),
            ),
            StateSpec::new(
                128,
                &[(1024, 0.377), (2048, 0.131), (0, 0.492)],
                SamplerSpec::discrete(&[
                    (0.0, 0.02),
                    (300.0, 0.01),
                    (450.0, 0.04),
                    (600.0, 0.1),
                    (750.0, 0.33),
                    (900.0, 0.27),
                    (1050.0, 0.2),
                    (1200.0, 0.04),
                ]),
                lognorm(1.595, -0.0427, 21.008),
            ),
            StateSpec::new(
                1024,
                &[(128, 0.693), (0, 0.306), (2048, 0.001)],
                SamplerSpec::discrete(&[
                    (0.0, 0.81),
                    (150.0, 0.02),
                    (300.0, 0.02),
                    (450.0, 0.02),
                    (600.0, 0.02),
                    (750.0, 0.04),
                    (900.0, 0.04),
                    (1050.0, 0.03),
                ]),
                expon(1.0, 7.418),
            ),
            StateSpec::new(
                2048,
                &[(128, 0.897), (0, 0.092), (1024, 0.011)],
                SamplerSpec::discrete(&[
                    (0.0, 0.33),
                    (150.0, 0.09),
                    (300.0, 0.09),
                    (450.0, 0.08),
                    (600.0, 0.05),
                    (750.0, 0.16),
                    (900.0, 0.09),
                    (1050.0, 0.1),
                    (1200.0, 0.01),
                ]),
                SamplerSpec::discrete(&[
                    (1.0, 128.0),
                    (6.0, 6.0),
                    (3.0, 7.0),
                    (9.0, 3.0),
                    (15.0, 1.0),
                    (10.0, 1.0),
                    (4.0, 5.0),
                    (2.0, 8.0),
                    (8.0, 2.0),
                    (5.0, 5.0),
                    (7.0, 3.0),
                    (11.0, 3.0),
                    (21.0, 1.0),
                    (13.0, 1.0),
                    (83.0, 1.0),
                ]),
            ),
        ],
    )
}

fn filler() -> MachineTypeSpec {
    MachineTypeSpec::new(
        "Filler",
        vec![
            StateSpec::new(
                0,
                &[(128, 0.371), (1024, 0.263), (32768, 0.193), (16384, 0.172)],
                STOPPED,
                expon(1.0, 8.075),
            ),
            StateSpec::new(
                128,
                &[(1024, 0.798), (16384, 0.104), (0, 0.080), (32768, 0.018)],
                SamplerSpec::discrete(&[
                    (841.0, 0.11),
                    (916.0, 0.01),
                    (999.0, 0.01),
                    (1200.0, 0.87),
                ]),
                lognorm(1.208, -0.078, 10.795),
            ),
            StateSpec::new(
                1024,
                &[(128, 0.853), (0, 0.063), (16384, 0.048), (32768, 0.063)],
                SamplerSpec::discrete(&[
                    (0.0, 0.74),
                    (208.0, 0.2),
                    (721.0, 0.02),
                    (841.0, 0.02),
                    (1200.0, 0.03),
                ]),
                expon(1.0, 3.106),
            ),
            StateSpec::new(
                16384,
                &[(128, 0.549), (0, 0.27), (1024, 0.172), (32768, 0.009)],
                SamplerSpec::discrete(&[(208.0, 0.98), (1200.0, 0.02)]),
                expon(1.0, 5.558),
            ),
            StateSpec::new(
                32768,
                &[(0, 0.364), (128, 0.364), (1024, 0.15), (16384, 0.122)],
                SamplerSpec::discrete(&[(208.0, 0.89), (333.0, 0.11)]),
                SamplerSpec::Pareto { b: 1.0, loc: 0.0, scale: 1.0 },
            ),
        ],
    )
}

#[rustfmt::skip]
const PASTEURIZER_RUN_DURATIONS: &[(f64, f64)] = &[
    (0.0, 1.0), (137.0, 1.0), (3.0, 11.0), (1.0, 18.0), (5.0, 4.0), (2.0, 8.0),
    (8.0, 1.0), (31.0, 1.0), (155.0, 1.0), (233.0, 2.0), (72.0, 2.0), (302.0, 1.0),
    (66.0, 1.0), (416.0, 1.0), (148.0, 1.0), (200.0, 1.0), (237.0, 1.0), (238.0, 1.0),
    (354.0, 1.0), (383.0, 2.0), (422.0, 1.0), (192.0, 1.0), (48.0, 1.0), (78.0, 1.0),
    (136.0, 1.0), (15.0, 1.0), (111.0, 1.0), (21.0, 1.0), (427.0, 1.0), (92.0, 1.0),
    (10.0, 2.0), (258.0, 1.0), (335.0, 1.0), (195.0, 1.0), (260.0, 1.0), (84.0, 1.0),
    (12.0, 1.0), (36.0, 1.0), (292.0, 1.0), (184.0, 1.0), (198.0, 1.0), (301.0, 1.0),
    (432.0, 2.0), (26.0, 1.0), (9.0, 1.0), (149.0, 1.0), (169.0, 1.0), (396.0, 1.0),
    (408.0, 1.0), (230.0, 1.0), (53.0, 1.0), (472.0, 1.0), (467.0, 1.0), (196.0, 1.0),
    (177.0, 1.0), (295.0, 1.0), (244.0, 1.0), (6.0, 2.0), (62.0, 1.0), (220.0, 1.0),
    (251.0, 1.0), (150.0, 2.0), (50.0, 1.0), (346.0, 1.0), (466.0, 1.0), (449.0, 1.0),
    (229.0, 1.0), (37.0, 1.0), (114.0, 1.0), (178.0, 1.0), (186.0, 1.0), (147.0, 1.0),
    (209.0, 1.0), (59.0, 2.0), (429.0, 1.0), (35.0, 1.0), (4.0, 2.0), (7.0, 1.0),
    (282.0, 1.0), (372.0, 1.0), (190.0, 1.0), (306.0, 1.0), (158.0, 1.0), (141.0, 1.0),
    (363.0, 1.0), (98.0, 1.0), (250.0, 1.0), (373.0, 1.0), (475.0, 1.0), (166.0, 1.0),
    (240.0, 1.0), (14.0, 1.0), (326.0, 1.0), (144.0, 1.0), (417.0, 1.0), (23.0, 1.0),
    (67.0, 1.0), (73.0, 1.0), (234.0, 1.0), (356.0, 1.0), (457.0, 1.0), (345.0, 1.0),
];

fn pasteurizer() -> MachineTypeSpec {
    MachineTypeSpec::new(
        "Pasteurizer",
        vec![
            StateSpec::new(
                0,
                &[(1024, 0.56), (128, 0.44)],
                STOPPED,
                SamplerSpec::discrete(&[
                    (1.0, 0.143),
                    (4.0, 0.071),
                    (37.0, 0.071),
                    (41.0, 0.071),
                    (47.0, 0.071),
                    (73.0, 0.071),
                    (117.0, 0.071),
                    (119.0, 0.071),
                    (140.0, 0.071),
                    (156.0, 0.071),
                    (170.0, 0.071),
                    (259.0, 0.071),
                    (294.0, 0.071),
                ]),
            ),
            StateSpec::new(
                128,
                &[(1024, 0.923), (0, 0.077)],
                SamplerSpec::discrete(&[(630.0, 0.3), (833.0, 0.088), (1291.0, 0.612)]),
                SamplerSpec::discrete(PASTEURIZER_RUN_DURATIONS),
            ),
            StateSpec::new(
                1024,
                &[(128, 0.954), (0, 0.046)],
                SamplerSpec::discrete(&[(630.0, 0.286), (833.0, 0.015), (1291.0, 0.699)]),
                SamplerSpec::Pareto { b: 1.0, loc: 0.0, scale: 1.0 },
            ),
        ],
    )
}

fn labeler_1() -> MachineTypeSpec {
    MachineTypeSpec::new(
        "Labeler1",
        vec![
            StateSpec::new(
                0,
                &[(128, 0.794), (4, 0.206)],
                STOPPED,
                lognorm(1.209, -0.012, 2.678),
            ),
            StateSpec::new(
                4,
                &[(128, 0.798), (0, 0.202)],
                SamplerSpec::discrete(&[
                    (0.0, 0.28),
                    (180.0, 0.09),
                    (181.0, 0.3),
                    (182.0, 0.28),
                    (183.0, 0.05),
                ]),
                expon(1.0, 1.887),
            ),
            StateSpec::new(
                128,
                &[(4, 0.503), (0, 0.497)],
                SamplerSpec::discrete(&[
                    (332.0, 0.01),
                    (333.0, 0.07),
                    (334.0, 0.09),
                    (335.0, 0.05),
                    (336.0, 0.02),
                    (584.0, 0.02),
                    (585.0, 0.07),
                    (586.0, 0.12),
                    (587.0, 0.1),
                    (588.0, 0.07),
                    (589.0, 0.04),
                    (590.0, 0.02),
                    (663.0, 0.01),
                    (664.0, 0.04),
                    (665.0, 0.06),
                    (666.0, 0.07),
                    (667.0, 0.05),
                    (668.0, 0.03),
                    (669.0, 0.03),
                    (670.0, 0.02),
                ]),
                beta(0.645, 57.206, 1.0, 4601.68),
            ),
        ],
    )
}

fn labeler_2() -> MachineTypeSpec {
    MachineTypeSpec::new(
        "Labeler2",
        vec![
            StateSpec::new(0, &[(128, 0.794), (4, 0.206)], STOPPED, expon(1.0, 7.03)),
            StateSpec::new(
                4,
                &[(128, 0.673), (0, 0.327)],
                SamplerSpec::discrete(&[
                    (0.0, 0.27),
                    (215.0, 0.13),
                    (216.0, 0.41),
                    (217.0, 0.16),
                    (218.0, 0.02),
                ]),
                expon(1.0, 1.055),
            ),
            StateSpec::new(
                128,
                &[(4, 0.603), (0, 0.397)],
                SamplerSpec::discrete(&[
                    (343.0, 0.04),
                    (344.0, 0.12),
                    (345.0, 0.08),
                    (346.0, 0.03),
                    (578.0, 0.02),
                    (579.0, 0.08),
                    (580.0, 0.14),
                    (581.0, 0.1),
                    (582.0, 0.06),
                    (583.0, 0.04),
                    (584.0, 0.04),
                    (585.0, 0.01),
                    (663.0, 0.03),
                    (664.0, 0.08),
                    (665.0, 0.05),
                    (666.0, 0.03),
                    (667.0, 0.03),
                    (668.0, 0.02),
                ]),
                beta(0.790, 150.314, -3.840e-25, 47684.3),
            ),
        ],
    )
}

// Two-state machines: stop <-> run
fn stop_run(
    name: &str,
    stop: SamplerSpec,
    speeds: &[(f64, f64)],
    run: SamplerSpec,
) -> MachineTypeSpec {
    MachineTypeSpec::new(
        name,
        vec![
            StateSpec::new(0, &[(128, 1.0)], STOPPED, stop),
            StateSpec::new(128, &[(0, 1.0)], SamplerSpec::discrete(speeds), run),
        ],
    )
}

fn capper() -> MachineTypeSpec {
    stop_run(
        "Capper",
        expon(1.0, 4.078),
        &[
            (0.0, 0.01),
            (420.0, 0.13),
            (600.0, 0.18),
            (840.0, 0.46),
            (1080.0, 0.02),
            (1200.0, 0.11),
            (1260.0, 0.01),
            (1320.0, 0.02),
            (1440.0, 0.07),
        ],
        lognorm(1.406, -0.0136, 8.660),
    )
}

fn packer() -> MachineTypeSpec {
    stop_run(
        "Packer",
        expon(1.0, 5.864),
        &[
            (0.0, 0.03),
            (390.0, 0.08),
            (480.0, 0.03),
            (510.0, 0.04),
            (540.0, 0.18),
            (550.0, 0.01),
            (570.0, 0.01),
            (600.0, 0.04),
            (630.0, 0.02),
            (660.0, 0.1),
            (690.0, 0.03),
            (720.0, 0.23),
            (750.0, 0.02),
            (780.0, 0.07),
            (900.0, 0.07),
            (1000.0, 0.01),
            (1050.0, 0.02),
        ],
        lognorm(1.59, -0.0136, 10.040),
    )
}

fn palletizer_1() -> MachineTypeSpec {
    stop_run(
        "Palletizer_1",
        expon(1.0, 9.135),
        &[(0.0, 0.57), (1200.0, 0.43)],
        beta(0.614, 365.763, -4.511e-28, 16265.5),
    )
}

fn palletizer_2() -> MachineTypeSpec {
    stop_run(
        "Palletizer_2",
        SamplerSpec::StudentT { df: 0.806, loc: 3.339, scale: 2.5 },
        &[(0.0, 0.63), (1200.0, 0.37)],
        SamplerSpec::StudentT { df: 0.579, loc: 8.931, scale: 13.984 },
    )
}

/// The complete bottling line: source, seven intermediate buffers, sink.
pub fn bottling_line() -> LineConfig {
    LineConfig {
        machine_types: vec![
            depalletizer(),
            filler(),
            pasteurizer(),
            labeler_1(),
            labeler_2(),
            capper(),
            packer(),
            palletizer_1(),
            palletizer_2(),
        ],
        buffers: vec![
            BufferSpec::source("Buffer_0"),
            BufferSpec::bounded("Buffer_1", 3256.0),
            BufferSpec::bounded("Buffer_2", 3400.0),
            BufferSpec::bounded("Buffer_3", 3366.0),
            BufferSpec::bounded("Buffer_4", 3420.0),
            BufferSpec::bounded("Buffer_5", 3530.0),
            BufferSpec::bounded("Buffer_6", 35612.0),
            BufferSpec::unbounded("Buffer_7"),
        ],
        machines: vec![
            MachineSpec::new("Depalletizer", "Depalletizer", 128, "Buffer_0", "Buffer_1"),
            MachineSpec::new("Filler", "Filler", 128, "Buffer_1", "Buffer_2"),
            MachineSpec::new("Pasteurizer", "Pasteurizer", 128, "Buffer_2", "Buffer_3"),
            MachineSpec::new("Labeler_1", "Labeler1", 128, "Buffer_3", "Buffer_4"),
            MachineSpec::new("Labeler_2", "Labeler2", 128, "Buffer_3", "Buffer_4"),
            MachineSpec::new("Capper", "Capper", 128, "Buffer_4", "Buffer_5"),
            MachineSpec::new("Packer", "Packer", 128, "Buffer_5", "Buffer_6"),
            MachineSpec::new("Palletizer_1", "Palletizer_1", 128, "Buffer_6", "Buffer_7"),
            MachineSpec::new("Palletizer_2", "Palletizer_2", 128, "Buffer_6", "Buffer_7"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::Line;
    use crate::core::execution::batch::run_single;
    use crate::core::execution::config::SimulationConfig;

    #[test]
    fn test_bottling_line_compiles() {
        let line = Line::from_config(&bottling_line()).unwrap();
        assert_eq!(
            line.machine_names(),
            vec![
                "Depalletizer",
                "Filler",
                "Pasteurizer",
                "Labeler_1",
                "Labeler_2",
                "Capper",
                "Packer",
                "Palletizer_1",
                "Palletizer_2",
            ]
        );
        assert_eq!(line.buffer_names().len(), 8);
    }

    #[test]
    fn test_short_bottling_run() {
        let line = Line::from_config(&bottling_line()).unwrap();
        let config = SimulationConfig::new().with_tick_horizon(60);
        let run = run_single(&line, 1, &config).unwrap();

        assert_eq!(run.events.len(), 60 * 9);
        assert!(run.events.iter().all(|event| event.actual_speed >= 0.0));
        assert!(run.events.iter().all(|event| !(event.tailback && event.lack)));

        // all machines start running, so the first tick requests parts
        let depalletizer = &run.events[0];
        assert_eq!(depalletizer.machine, "Depalletizer");
        assert_eq!(depalletizer.state, 128);
    }

    #[test]
    fn test_bottling_line_survives_json() {
        let config = bottling_line();
        let json = config.to_json_pretty().unwrap();
        let restored = crate::core::builder::LineConfig::from_json(&json).unwrap();
        assert!(Line::from_config(&restored).is_ok());
    }
}
