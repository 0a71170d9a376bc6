use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use svg2png::{RasterConfig, Rasterizer, SourceAsset};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

#[tokio::test]
async fn golden_raster_matches_fixture() {
    let svg = fs::read("tests/fixtures/red_square.svg").expect("read fixture");
    let cfg = RasterConfig {
        load_system_fonts: false,
        ..Default::default()
    };
    let rasterizer = Rasterizer::new(cfg).expect("create rasterizer");
    let result = rasterizer
        .rasterize(SourceAsset::new(svg, "image/svg+xml"))
        .await
        .expect("rasterize");

    // Goldens store the digest of the decoded RGBA pixels, so they do not
    // depend on the deflate implementation of the PNG encoder
    let bitmap = result.decode().expect("decode output");
    let digest = hex::encode(Sha256::digest(&bitmap.rgba));

    let expected_path = golden_path("red_square.rgba.sha256");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, format!("{}\n", digest)).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    let expected = fs::read_to_string(&expected_path).unwrap_or_else(|_| {
        panic!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it",
            expected_path
        )
    });
    assert_eq!((bitmap.width, bitmap.height), (200, 200));
    assert_eq!(digest, expected.trim());
}
