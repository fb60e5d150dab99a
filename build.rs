fn main() {
    #[cfg(all(feature = "embed", feature = "reload"))]
    compile_error!("feature \"embed\" and feature \"reload\" cannot be enabled at the same time");

    #[cfg(not(any(feature = "embed", feature = "reload")))]
    compile_error!("one of feature \"embed\" or feature \"reload\" must be enabled");

    #[cfg(not(any(feature = "sqlite", feature = "postgres")))]
    compile_error!("one of feature \"sqlite\" or feature \"postgres\" must be enabled");

    println!("cargo:rerun-if-changed=migrations");

    #[cfg(feature = "embed")]
    {
        use std::env;
        use std::path::PathBuf;
        let template_path = if let Ok(value) = env::var("HTTP_TEMPLATES_PATH") {
            value.to_string()
        } else {
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("templates")
                .display()
                .to_string()
        };
        println!("cargo:rerun-if-changed={template_path}");
        minijinja_embed::embed_templates!(&template_path);
    }
}
