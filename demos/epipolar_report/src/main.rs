use argh::FromArgs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use kornia_epipolar::lines::{line_segment, Palette};
use kornia_epipolar::metrics::{epipolar_lines, evaluate, DistanceReport};
use kornia_epipolar::points::Correspondences;
use kornia_epipolar::{fundamental_8point, FundamentalMatrix, FundamentalParams};

#[derive(FromArgs)]
/// Estimate the fundamental matrix with the regular and the normalized 8-point
/// algorithm and compare their symmetric epipolar and algebraic distances
struct Args {
    /// path to a json file with `left` and `right` point lists; the built-in
    /// image pairs are used when omitted
    #[argh(option, short = 'p')]
    points: Option<PathBuf>,

    /// run a single estimator: `normalized` or `regular`
    #[argh(option)]
    only: Option<String>,

    /// print the report as json
    #[argh(switch)]
    json: bool,

    /// print the epipolar line segments for an image of this width
    #[argh(option)]
    lines_width: Option<f64>,

    /// seed of the line color palette
    #[argh(option, default = "0")]
    seed: u64,
}

/// Correspondences of one image pair.
#[derive(Debug, Clone, Deserialize)]
struct PointPairs {
    #[serde(default)]
    name: String,
    left: Vec<[f64; 2]>,
    right: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
struct Row {
    dataset: String,
    algorithm: &'static str,
    fundamental: FundamentalMatrix,
    distances: DistanceReport,
}

fn builtin_pairs() -> Vec<PointPairs> {
    vec![
        PointPairs {
            name: "courtroom".to_string(),
            left: vec![
                [207.0, 13.0],
                [279.0, 130.0],
                [309.0, 268.0],
                [408.0, 438.0],
                [377.0, 243.0],
                [419.0, 272.0],
                [483.0, 144.0],
                [587.0, 128.0],
                [610.0, 185.0],
                [727.0, 63.0],
            ],
            right: vec![
                [265.0, 1.0],
                [313.0, 91.0],
                [389.0, 198.0],
                [536.0, 281.0],
                [385.0, 182.0],
                [446.0, 199.0],
                [458.0, 96.0],
                [541.0, 82.0],
                [562.0, 127.0],
                [655.0, 35.0],
            ],
        },
        PointPairs {
            name: "family".to_string(),
            left: vec![
                [121.0, 53.0],
                [133.0, 247.0],
                [214.0, 312.0],
                [463.0, 317.0],
                [764.0, 156.0],
                [700.0, 136.0],
                [842.0, 321.0],
                [738.0, 278.0],
                [490.0, 292.0],
            ],
            right: vec![
                [577.0, 37.0],
                [59.0, 247.0],
                [112.0, 309.0],
                [353.0, 343.0],
                [226.0, 163.0],
                [203.0, 155.0],
                [738.0, 427.0],
                [721.0, 322.0],
                [591.0, 308.0],
            ],
        },
    ]
}

fn estimators(only: Option<&str>) -> Result<Vec<(&'static str, FundamentalParams)>, String> {
    let all = [
        ("Normalized 8-point", FundamentalParams::default()),
        ("Regular 8-point", FundamentalParams::unnormalized()),
    ];
    match only {
        None => Ok(all.to_vec()),
        Some("normalized") => Ok(vec![all[0].clone()]),
        Some("regular") => Ok(vec![all[1].clone()]),
        Some(other) => Err(format!("unknown estimator `{other}`, use normalized or regular")),
    }
}

fn print_lines(f: &FundamentalMatrix, c: &Correspondences, width: f64, seed: u64) {
    let lines = epipolar_lines(f, c);
    // the right image reuses the colors of the left one
    let colors = Palette::new(seed).colors(c.len());
    for (image, image_lines) in [("left", &lines.left), ("right", &lines.right)] {
        println!("  {image} image epipolar lines:");
        for (line, color) in image_lines.iter().zip(&colors) {
            match line_segment(line, width) {
                Some((p0, p1)) => println!(
                    "    rgb{color:?}: ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                    p0[0], p0[1], p1[0], p1[1]
                ),
                None => println!("    rgb{color:?}: vertical line {line:?}"),
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let datasets = match &args.points {
        Some(path) => {
            let mut pairs: PointPairs = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            if pairs.name.is_empty() {
                pairs.name = path.display().to_string();
            }
            vec![pairs]
        }
        None => builtin_pairs(),
    };
    let estimators = estimators(args.only.as_deref())?;

    let mut rows = Vec::new();
    for dataset in &datasets {
        log::info!(
            "{}: {} left / {} right points",
            dataset.name,
            dataset.left.len(),
            dataset.right.len()
        );
        let c = Correspondences::from_points(&dataset.left, &dataset.right)?;

        for &(algorithm, ref params) in &estimators {
            let f = fundamental_8point(&c, params)?;
            let distances = evaluate(&f, &c);
            if let Some(width) = args.lines_width {
                println!("{} ({algorithm})", dataset.name);
                print_lines(&f, &c, width, args.seed);
            }
            rows.push(Row {
                dataset: dataset.name.clone(),
                algorithm,
                fundamental: f,
                distances,
            });
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<12} {:<20} {:>30} {:>20}",
        "Dataset", "Algorithm", "Symmetric epipolar distance", "Algebraic distance"
    );
    for row in &rows {
        println!(
            "{:<12} {:<20} {:>30.6} {:>20.6e}",
            row.dataset, row.algorithm, row.distances.symmetric_epipolar, row.distances.algebraic
        );
    }

    Ok(())
}
