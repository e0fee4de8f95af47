// Test case for NO_PRINTLN lint

fn bad_println(subject: &str) {
    println!("resolved subject {}", subject);
}

fn bad_print() {
    print!("no newline either");
}

fn bad_eprintln() {
    eprintln!("delegation rejected");
}

fn bad_dbg(token: &str) {
    dbg!(token);
}

// Good: using tracing
fn good_tracing(subject: &str) {
    tracing::info!(%subject, "request identity resolved");
}

fn main() {
    bad_println("U1");
    bad_print();
    bad_eprintln();
    bad_dbg("t");
    good_tracing("U1");
}
