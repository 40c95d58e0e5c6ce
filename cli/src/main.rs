use anyhow::{Context, Result};
use cars_core::{
    car_id_from_url, CarForm, ClientConfig, EditFlow, Executor, HtmlEscaper, ListQuery,
    ReqwestTransport, ResourceId, SelectOption,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cars")]
#[command(about = "Command-line client for the car inventory API")]
#[command(version)]
struct Cli {
    /// Backend base URL (defaults to $CARS_API_URL, then the public backend)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// `--base-url` wins over `CARS_API_URL`.
    fn config(&self) -> ClientConfig {
        match &self.base_url {
            Some(base_url) => ClientConfig {
                base_url: base_url.clone(),
            },
            None => ClientConfig::from_env(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List cars, optionally filtered and sorted
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        order_by: Option<String>,
        #[arg(long)]
        sort_order: Option<String>,
    },
    /// Show one car
    Get { id: String },
    /// Create a car
    Create(CarArgs),
    /// Replace a car's fields
    Update {
        id: String,
        #[command(flatten)]
        car: CarArgs,
    },
    /// Delete a car
    Delete { id: String },
    /// List makes
    Makes,
    /// List the models of a make
    Models { make_id: String },
    /// List body types
    BodyTypes,
    /// Load the edit form for an edit page URL (`...?car=<id>`)
    Edit { url: String },
}

/// Raw form values; validated before anything is sent.
#[derive(Args)]
struct CarArgs {
    #[arg(long)]
    make_id: String,
    #[arg(long)]
    car_model_id: String,
    #[arg(long)]
    body_type_id: String,
    #[arg(long)]
    year: String,
    #[arg(long)]
    mileage: String,
    #[arg(long, default_value = "")]
    description: String,
}

impl From<CarArgs> for CarForm {
    fn from(args: CarArgs) -> Self {
        CarForm::new()
            .with("make_id", args.make_id)
            .with("car_model_id", args.car_model_id)
            .with("body_type_id", args.body_type_id)
            .with("year", args.year)
            .with("mileage", args.mileage)
            .with("description", args.description)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print a response body, pretty-printed when it is JSON.
fn print_body(body: &str) -> Result<()> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{body}"),
    }
    Ok(())
}

fn print_options(title: &str, options: &[SelectOption]) {
    println!("{title}:");
    for option in options {
        println!("  {:>6}  {}", option.value, option.label);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let api = Executor::new(cli.config().client(), ReqwestTransport::new());

    match cli.command {
        Command::List {
            page,
            keyword,
            order_by,
            sort_order,
        } => {
            let query = ListQuery {
                page,
                keyword,
                order_by,
                sort_order,
            };
            print_body(&api.list_cars(&query).await.context("listing cars")?)?;
        }
        Command::Get { id } => {
            print_body(&api.get_car(&ResourceId::from(id)).await.context("fetching car")?)?;
        }
        Command::Create(car) => {
            let payload = CarForm::from(car).to_payload(&HtmlEscaper)?;
            print_body(&api.create_car(&payload).await.context("creating car")?)?;
        }
        Command::Update { id, car } => {
            let payload = CarForm::from(car).to_payload(&HtmlEscaper)?;
            let body = api
                .update_car(&ResourceId::from(id), &payload)
                .await
                .context("updating car")?;
            print_body(&body)?;
        }
        Command::Delete { id } => {
            api.delete_car(&ResourceId::from(id.as_str()))
                .await
                .context("deleting car")?;
            println!("deleted car {id}");
        }
        Command::Makes => print_body(&api.list_makes().await.context("fetching makes")?)?,
        Command::Models { make_id } => {
            let body = api
                .list_models(&ResourceId::from(make_id))
                .await
                .context("fetching models")?;
            print_body(&body)?;
        }
        Command::BodyTypes => {
            print_body(&api.list_body_types().await.context("fetching body types")?)?;
        }
        Command::Edit { url } => {
            let page = EditFlow::new(&api)
                .load(car_id_from_url(&url))
                .await
                .context("loading edit page")?;
            println!("car {}", page.car_id);
            for (name, value) in page.form.fields() {
                println!("  {name} = {value}");
            }
            print_options("makes", &page.makes);
            print_options("models", &page.models);
            print_options("body types", &page.body_types);
        }
    }

    Ok(())
}
