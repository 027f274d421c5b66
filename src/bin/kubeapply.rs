use kubeapply::app;
use kubeapply::apply::CancelToken;

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cancel = CancelToken::new();
    if let Err(err) = app::signals::cancel_on_termination(cancel.clone()) {
        eprintln!("warning: cannot watch for termination signals: {err}");
    }
    let output = app::run_cli_with_cancel(args, &cancel)?;
    println!("{output}");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
