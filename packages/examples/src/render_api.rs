//! Walkthrough of registering codes and rendering error chains under every flag

use errchain::{filter_out, is, new_aggregate, Coder, Error, Flags, ResultExt};

const ERR_USER_NOT_FOUND: i32 = 110_001;
const ERR_DATABASE: i32 = 100_101;

fn find_user(id: u32) -> errchain::Result<String> {
    Err(errchain::with_code!(ERR_USER_NOT_FOUND, "no row for user {id}"))
}

fn load_profile(id: u32) -> errchain::Result<String> {
    find_user(id).wrap("loading profile")
}

fn connect() -> errchain::Result<()> {
    let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
    Err(Error::from(refused)).wrap_c(ERR_DATABASE, "opening pool")
}

fn print_renders(label: &str, err: &Error) {
    println!("== {label}");
    println!("plain:          {err}");
    println!("detail {{:-}}:   {err:-}");
    println!("trace {{:+}}:    {err:+}");
    println!("machine {{:#}}:  {err:#}");
    println!("trace+machine:  {err:+#}");
    println!("debug {{:#?}}:   {err:#?}");
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    errchain::must_register(Coder::new(
        ERR_USER_NOT_FOUND,
        404,
        "User not found",
        "https://example.com/errors/110001",
    ));
    errchain::must_register(Coder::new(
        ERR_DATABASE,
        500,
        "Database error",
        "https://example.com/errors/100101",
    ));

    let profile_err = match load_profile(7) {
        Ok(profile) => {
            println!("Loaded profile {profile}");
            return Ok(());
        }
        Err(e) => e,
    };
    print_renders("coded chain", &profile_err);

    if let Some(coder) = errchain::parse_coder(&profile_err) {
        println!(
            "Respond with HTTP {} ({}), see {}",
            coder.http_status(),
            coder,
            coder.reference()
        );
    }

    let plain_err = Error::new("disk full").wrap("saving profile");
    print_renders("uncoded chain", &plain_err);

    let db_err = match connect() {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    print_renders("foreign cause", &db_err);
    if let Some(io) = db_err.downcast_ref::<std::io::Error>() {
        log::warn!("Underlying I/O failure: {:?}", io.kind());
    }

    let aggregate = new_aggregate([profile_err.clone(), plain_err, db_err.clone()])
        .map(Error::from)
        .ok_or("nothing to aggregate")?;
    print_renders("aggregate", &aggregate);

    let is_db = |err: &Error| is(err, &db_err);
    let remaining = filter_out(aggregate, &[&is_db]);
    match remaining {
        Some(err) => println!("After filtering database errors: {err}"),
        None => println!("After filtering database errors: nothing left"),
    }

    let classified = errchain::is_code(&profile_err, ERR_USER_NOT_FOUND);
    println!("Profile error is user-not-found: {classified}");
    println!("Trace only, as records: {:?}", profile_err.records(Flags::TRACE));

    Ok(())
}
