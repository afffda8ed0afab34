//! Builds a camera registry on disk, mutates it, and reloads it to show the
//! persisted JSON shape.
//!
//! Run with: `cargo run --example registry_roundtrip`

use camvisor::{CameraRecord, CameraRegistry, Endpoint};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let path = std::env::temp_dir().join("camvisor-demo-config.json");
    let _ = std::fs::remove_file(&path);

    let registry = CameraRegistry::open(&path);
    let gate = registry.add(
        CameraRecord::new(
            "front-gate",
            Endpoint::Rtsp {
                url: "rtsp://10.0.0.12/stream1".into(),
            },
        )
        .with_credentials("viewer", "secret"),
    )?;
    let lobby = registry.add(CameraRecord::new(
        "lobby",
        Endpoint::Http {
            host: "10.0.0.13".into(),
            port: 8080,
        },
    ))?;

    registry.set_connected(gate, true);
    registry.set_layout("1x2");

    println!("wrote {}:", path.display());
    println!("{}", std::fs::read_to_string(&path)?);

    let reopened = CameraRegistry::open(&path);
    for (id, record) in reopened.list() {
        let entry = reopened.entry(id).ok_or("entry vanished")?;
        println!(
            "camera {id}: {} via {} (connected: {})",
            record.name,
            record.endpoint.protocol(),
            entry.connected
        );
    }
    assert_eq!(reopened.len(), 2);
    assert!(reopened.get(lobby).is_some());

    std::fs::remove_file(&path)?;
    Ok(())
}
