//! Export commands for database sources

use crate::cli::error::CliError;
use crate::connectors::{Connector, MysqlConfig, MysqlConnector};
use std::path::Path;
use tracing::info;

/// Public relational dataset repository
pub const RDR_HOST: &str = "relational.fit.cvut.cz";
pub const RDR_PORT: u16 = 3306;
pub const RDR_USER: &str = "guest";
pub const RDR_PASSWORD: &str = "relational";

/// Connection settings for a database of the relational dataset repository
pub fn rdr_config(database: &str) -> MysqlConfig {
    MysqlConfig::new(RDR_HOST, RDR_USER, RDR_PASSWORD, database).with_port(RDR_PORT)
}

/// Handle the mysql command
pub fn handle_mysql(config: MysqlConfig, output_dir: &Path) -> Result<(), CliError> {
    info!("Exporting {} to {}", config.database, output_dir.display());
    let mut connector = MysqlConnector::connect(config)?;
    connector.export(output_dir)?;
    println!(
        "Exported {} table(s) to {}",
        connector.metadata().tables().len(),
        output_dir.display()
    );
    Ok(())
}

/// Handle the rdr command
pub fn handle_rdr(database: &str, output_dir: &Path) -> Result<(), CliError> {
    handle_mysql(rdr_config(database), output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdr_config() {
        let config = rdr_config("financial");
        assert_eq!(config.host, "relational.fit.cvut.cz");
        assert_eq!(config.port, 3306);
        assert_eq!(config.user, "guest");
        assert_eq!(config.database, "financial");
    }
}
