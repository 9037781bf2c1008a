use crate::cli::args::CliArgs;

// Flag-level checks only. Values that can also come from the config file are
// checked once the two are merged, and `Runner::new` owns the fetch options.
pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.ids.as_deref() {
        crate::utils::parse_id_range(raw).map_err(|e| format!("invalid --ids '{raw}': {e}"))?;
    }
    if args.page == Some(0) {
        return Err("invalid --page, page numbers start at 1".to_string());
    }
    Ok(())
}
