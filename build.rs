fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use the vendored compiler unless the caller points PROTOC somewhere else.
    if std::env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()?;
        // SAFETY: build scripts are single-threaded.
        unsafe {
            std::env::set_var("PROTOC", protoc);
        }
    }

    println!("cargo:rerun-if-changed=proto");

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/urlshort/v1/url_shortener.proto"], &["proto"])?;

    Ok(())
}
