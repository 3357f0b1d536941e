use color_eyre::eyre::{
    Result,
    eyre,
};
use craps::wallet::{
    Balance,
    StaticWallet,
};

/// Build the wallet the table reads from. An address without a balance is
/// allowed; every wager will then be refused as exceeding the balance.
pub fn wallet_from_flags(
    address: Option<&str>,
    balance: Option<&str>,
) -> Result<StaticWallet> {
    let address = match address.map(str::trim) {
        Some("") => return Err(eyre!("--address must not be empty")),
        Some(raw) => Some(raw.to_owned()),
        None => None,
    };
    let balance = match balance.map(str::trim) {
        Some(raw) => {
            let parsed = raw
                .parse::<f64>()
                .map_err(|_| eyre!("--balance must be a decimal number, got '{raw}'"))?;
            if !parsed.is_finite() || parsed < 0.0 {
                return Err(eyre!("--balance must be a non-negative number, got '{raw}'"));
            }
            Some(Balance::new(raw))
        }
        None => None,
    };
    Ok(StaticWallet::new(address, balance))
}

/// Flag combinations that parse but are probably a mistake. Reported once
/// logging is up.
pub fn flag_warnings(address: Option<&str>, balance: Option<&str>) -> Vec<String> {
    let mut warnings = Vec::new();
    if address.is_none() && balance.is_some() {
        warnings.push(
            "--balance given without --address; rolling stays disabled".to_string(),
        );
    }
    warnings
}
