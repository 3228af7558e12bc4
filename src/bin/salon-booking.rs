use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use salon_booking::actions::ActionResult;
use salon_booking::booking::{BookingForm, BookingList, ListState, SubmitOutcome, EMPTY_MESSAGE};
use salon_booking::config::{BookingOptions, StoreBackend};
use salon_booking::validation::Field;
use salon_booking::Salon;

#[derive(Parser)]
#[command(name = "salon-booking", version, about = "Book and manage salon appointments")]
struct Cli {
    /// Appointment store to use, overriding SALON_STORE
    #[arg(long, global = true)]
    backend: Option<StoreBackend>,

    /// JSON file for the local store, overriding SALON_DATA_FILE
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the salon's services, hours and contact details
    Info,
    /// Show bookable start times and stylists
    Slots,
    /// List appointments, earliest first
    List,
    /// Book a new appointment
    Add(BookingArgs),
    /// Change an existing appointment; omitted fields keep their value
    Edit {
        id: Uuid,
        #[command(flatten)]
        booking: BookingArgs,
    },
    /// Cancel an appointment
    Remove { id: Uuid },
}

#[derive(Args)]
struct BookingArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    /// HH:MM
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    stylist: Option<String>,
}

impl BookingArgs {
    fn apply(self, form: &mut BookingForm) {
        let fields = [
            (Field::ClientName, self.name),
            (Field::PhoneNumber, self.phone),
            (Field::Date, self.date),
            (Field::Time, self.time),
            (Field::Stylist, self.stylist),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                form.set_field(field, value);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut options = BookingOptions::from_env().context("Failed to read configuration")?;
    if let Some(backend) = cli.backend {
        options = options.with_backend(backend);
    }
    if let Some(path) = cli.data_file {
        options = options.with_data_file(path);
    }
    let salon = Salon::new(options).context("Failed to open the appointment store")?;

    let succeeded = match cli.command {
        Command::Info => {
            println!("{}", salon.profile());
            true
        }
        Command::Slots => {
            println!("Times:    {}", BookingForm::time_options().join(" "));
            let stylists: Vec<&str> = BookingForm::stylist_options()
                .iter()
                .map(|stylist| stylist.name())
                .collect();
            println!("Stylists: {}", stylists.join(", "));
            true
        }
        Command::List => {
            let list = salon.booking_list().await;
            print_list(&list)?;
            true
        }
        Command::Add(booking) => {
            let mut form = salon.booking_form();
            booking.apply(&mut form);
            let outcome = form.submit(salon.actions()).await;
            report_submit(&form, outcome)
        }
        Command::Edit { id, booking } => {
            let list = salon.booking_list().await;
            let mut form = salon.booking_form();
            if !list.edit(id, |appointment| form.load(appointment)) {
                bail!("No appointment with id {}", id);
            }
            booking.apply(&mut form);
            let outcome = form.submit(salon.actions()).await;
            report_submit(&form, outcome)
        }
        Command::Remove { id } => {
            let mut list = salon.booking_list().await;
            let result = list.delete_optimistic(id).await;
            report(&result)
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_list(list: &BookingList) -> anyhow::Result<()> {
    if let ListState::Failed(reason) = list.state() {
        bail!("Could not load appointments: {}", reason);
    }

    let items = list.items(chrono::Local::now().naive_local());
    if items.is_empty() {
        println!("{}", EMPTY_MESSAGE);
        return Ok(());
    }

    for item in items {
        let appointment = &item.appointment;
        println!(
            "{}  {} {}  {:<20} {:<16} {:<8} [{}] {}",
            appointment.id,
            appointment.date,
            appointment.time.format("%H:%M"),
            appointment.client_name,
            appointment.phone_number,
            appointment.stylist,
            item.urgency.badge(),
            item.time_remaining,
        );
    }
    Ok(())
}

fn report_submit(form: &BookingForm, outcome: SubmitOutcome) -> bool {
    match outcome {
        SubmitOutcome::Created(appointment) | SubmitOutcome::Updated(appointment) => {
            println!("{}", form.message().unwrap_or_default());
            println!("{}", appointment.id);
            true
        }
        SubmitOutcome::Invalid | SubmitOutcome::Failed => {
            if let Some(message) = form.message() {
                eprintln!("{}", message);
            }
            for (field, message) in form.errors().iter() {
                eprintln!("  {}: {} (got {:?})", field, message, form.value(field));
            }
            false
        }
        SubmitOutcome::Busy => false,
    }
}

fn report(result: &ActionResult) -> bool {
    if result.is_success() {
        println!("{}", result.message);
    } else {
        eprintln!("{}", result.message);
        for (field, message) in result.errors.iter() {
            eprintln!("  {}: {}", field, message);
        }
    }
    result.is_success()
}
