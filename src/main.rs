use clap::Parser;
use checkout_controller::cli::commands::{CheckoutInput, cmd_add_to_cart, cmd_format, cmd_submit};
use checkout_controller::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref());

    // Resolve settings: CLI > config > defaults
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(trace) = cli.trace {
        config.trace = Some(trace);
    }

    match cli.command {
        Commands::Format { field, value } => {
            println!("{}", cmd_format(&field, &value)?);
        }
        Commands::Submit {
            trigger,
            product_id,
            name,
            address,
            card_number,
            expiry_date,
            cvv,
            page,
        } => {
            let input = CheckoutInput {
                name,
                address,
                card_number,
                expiry_date,
                cvv,
            };
            let moved_on = cmd_submit(
                &config,
                &trigger,
                product_id.as_deref(),
                &input,
                page.as_deref(),
                cli.verbose,
            )?;
            if !moved_on {
                std::process::exit(1);
            }
        }
        Commands::AddToCart { product_id } => {
            if !cmd_add_to_cart(&config, &product_id, cli.verbose)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
