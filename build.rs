use std::path::Path;

const ICON_CANDIDATES: [&str; 2] = ["assets/squid.ico", "ico/app.ico"];

fn main() {
    for candidate in ICON_CANDIDATES {
        println!("cargo:rerun-if-changed={candidate}");
    }

    // Resource embedding only matters for the Windows executable.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }

    let Some(icon_path) = ICON_CANDIDATES
        .into_iter()
        .find(|candidate| Path::new(candidate).is_file())
    else {
        println!("cargo:warning=no squid_dock icon found; executable keeps the default icon");
        return;
    };

    let mut res = winres::WindowsResource::new();
    res.set_icon(icon_path);
    res.set("ProductName", "Squid Dock");
    res.set("FileDescription", "Squid Dock floating launcher");
    res.set("OriginalFilename", "squid_dock.exe");
    res.set("InternalName", "squid_dock");
    if let Err(err) = res.compile() {
        panic!("failed to embed {icon_path} into the executable: {err}");
    }
}
