use anyhow::{bail, Context, Result};
use calculator::controller::{CalculatorState, SubmitOutcome};
use calculator::entities::draft::{CUSTOM_BOX_SIZE, CUSTOM_PALLET_WEIGHT};
use calculator::entities::{CustomBoxSize, DraftUpdate, Quantity, Step};
use calculator::pricing::QuoteRequest;
use calculator::validators::{validate_step, AddressCheck};
use calculator::Calculator;
use order_api::entities::pricing::Dimension;
use order_api::entities::{CargoKind, CreateOrderRequest, ServiceRef};
use std::fmt::Write;
use std::str::FromStr;

pub const HELP: &str = "\
Команды:
  marketplace <id>            выбрать маркетплейс
  warehouse <id>              выбрать склад
  type <box|pallet> [off]     отметить тип груза
  qty <box|pallet> <n>        количество
  box-size <размер>           размер коробки
  box-custom <д> <ш> <в>      свой размер коробки, см
  pallet-weight <вес>         весовая категория паллет
  pallet-custom <кг>          свой вес паллеты
  service <id> [off]          доп. услуга
  address <адрес>             адрес забора груза
  name|phone|company|email|value|comment <текст>
  next | back | submit | summary | new | dismiss | help | quit";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ContactField {
    Name,
    Phone,
    Company,
    Email,
    CargoValue,
    Comments,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Command {
    Marketplace(String),
    Warehouse(String),
    CargoType { kind: CargoKind, selected: bool },
    Quantity { kind: CargoKind, quantity: Quantity },
    BoxSize(String),
    CustomBoxSize(CustomBoxSize),
    PalletWeight(String),
    CustomPalletWeight(Dimension),
    Service { service: ServiceRef, selected: bool },
    PickupAddress(String),
    Contact { field: ContactField, value: String },
    Next,
    Back,
    Submit,
    Summary,
    NewOrder,
    Dismiss,
    Help,
    Quit,
}

fn parse_toggle(rest: &str) -> Result<(&str, bool)> {
    match rest.rsplit_once(char::is_whitespace) {
        Some((value, "off")) => Ok((value.trim(), false)),
        _ if rest.is_empty() => bail!("an argument is expected"),
        _ => Ok((rest, true)),
    }
}

fn parse_dimension(value: &str) -> Result<Dimension> {
    Dimension::from_str(value.trim().replace(',', ".").as_str())
        .with_context(|| format!("invalid number: {}", value))
}

fn required(rest: &str) -> Result<String> {
    if rest.is_empty() {
        bail!("an argument is expected");
    }

    Ok(rest.to_string())
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        let command = match verb {
            "marketplace" => Command::Marketplace(required(rest)?),
            "warehouse" => Command::Warehouse(required(rest)?),
            "type" => {
                let (kind, selected) = parse_toggle(rest)?;
                Command::CargoType {
                    kind: kind.parse()?,
                    selected,
                }
            }
            "qty" => {
                let (kind, quantity) = rest
                    .rsplit_once(char::is_whitespace)
                    .context("usage: qty <box|pallet> <n>")?;
                Command::Quantity {
                    kind: kind.parse()?,
                    quantity: quantity
                        .parse()
                        .with_context(|| format!("invalid quantity: {}", quantity))?,
                }
            }
            "box-size" => Command::BoxSize(required(rest)?),
            "box-custom" => {
                let dimensions = rest
                    .split_whitespace()
                    .map(parse_dimension)
                    .collect::<Result<Vec<_>>>()?;
                match dimensions.as_slice() {
                    [length, width, height] => Command::CustomBoxSize(CustomBoxSize {
                        length: Some(*length),
                        width: Some(*width),
                        height: Some(*height),
                    }),
                    _ => bail!("usage: box-custom <length> <width> <height>"),
                }
            }
            "pallet-weight" => Command::PalletWeight(required(rest)?),
            "pallet-custom" => Command::CustomPalletWeight(parse_dimension(rest)?),
            "service" => {
                let (service, selected) = parse_toggle(rest)?;
                Command::Service {
                    service: service.parse()?,
                    selected,
                }
            }
            "address" => Command::PickupAddress(rest.to_string()),
            "name" | "phone" | "company" | "email" | "value" | "comment" => {
                let field = match verb {
                    "name" => ContactField::Name,
                    "phone" => ContactField::Phone,
                    "company" => ContactField::Company,
                    "email" => ContactField::Email,
                    "value" => ContactField::CargoValue,
                    _ => ContactField::Comments,
                };
                Command::Contact {
                    field,
                    value: rest.to_string(),
                }
            }
            "next" => Command::Next,
            "back" => Command::Back,
            "submit" => Command::Submit,
            "summary" => Command::Summary,
            "new" => Command::NewOrder,
            "dismiss" => Command::Dismiss,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => bail!("unknown command: {}", verb),
        };

        Ok(command)
    }
}

/// What the event loop has to do after a command.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Reaction {
    Render,
    Quote(QuoteRequest),
    Order(CreateOrderRequest),
    Print(String),
    Quit,
}

fn quote_or_render(request: Option<QuoteRequest>) -> Reaction {
    request.map(Reaction::Quote).unwrap_or(Reaction::Render)
}

fn contact_update(field: ContactField, value: String) -> DraftUpdate {
    let value = Some(value);
    match field {
        ContactField::Name => DraftUpdate {
            client_name: value,
            ..Default::default()
        },
        ContactField::Phone => DraftUpdate {
            phone_number: value,
            ..Default::default()
        },
        ContactField::Company => DraftUpdate {
            company: value,
            ..Default::default()
        },
        ContactField::Email => DraftUpdate {
            email: value,
            ..Default::default()
        },
        ContactField::CargoValue => DraftUpdate {
            cargo_value: value,
            ..Default::default()
        },
        ContactField::Comments => DraftUpdate {
            comments: value,
            ..Default::default()
        },
    }
}

pub fn apply(calculator: &mut Calculator, command: Command) -> Reaction {
    match command {
        Command::Marketplace(marketplace) => {
            quote_or_render(calculator.select_marketplace(&marketplace))
        }
        Command::Warehouse(warehouse) => {
            quote_or_render(calculator.merge_field(DraftUpdate::warehouse(&warehouse)))
        }
        Command::CargoType { kind, selected } => {
            let mut selected_types = calculator.draft().selected_types.clone();
            if selected {
                selected_types.insert(kind);
            } else {
                selected_types.remove(&kind);
            }

            quote_or_render(calculator.merge_field(DraftUpdate {
                selected_types: Some(selected_types),
                ..Default::default()
            }))
        }
        Command::Quantity { kind, quantity } => {
            let mut quantities = calculator.draft().quantities.clone();
            quantities.insert(kind, quantity);

            quote_or_render(calculator.merge_field(DraftUpdate {
                quantities: Some(quantities),
                ..Default::default()
            }))
        }
        Command::BoxSize(size) => quote_or_render(calculator.merge_field(DraftUpdate {
            selected_box_sizes: Some(vec![size]),
            ..Default::default()
        })),
        Command::CustomBoxSize(size) => quote_or_render(calculator.merge_field(DraftUpdate {
            selected_box_sizes: Some(vec![CUSTOM_BOX_SIZE.to_string()]),
            custom_box_size: Some(size),
            ..Default::default()
        })),
        Command::PalletWeight(weight) => quote_or_render(calculator.merge_field(DraftUpdate {
            selected_pallet_weights: Some(vec![weight]),
            ..Default::default()
        })),
        Command::CustomPalletWeight(weight) => {
            quote_or_render(calculator.merge_field(DraftUpdate {
                selected_pallet_weights: Some(vec![CUSTOM_PALLET_WEIGHT.to_string()]),
                custom_pallet_weight: Some(Some(weight)),
                ..Default::default()
            }))
        }
        Command::Service { service, selected } => {
            quote_or_render(calculator.toggle_service(&service, selected))
        }
        Command::PickupAddress(address) => {
            quote_or_render(calculator.merge_field(DraftUpdate::pickup_address(&address)))
        }
        Command::Contact { field, value } => {
            quote_or_render(calculator.merge_field(contact_update(field, value)))
        }
        Command::Next => {
            calculator.go_next();
            Reaction::Render
        }
        Command::Back => {
            calculator.go_back();
            Reaction::Render
        }
        Command::Submit => match calculator.begin_submit() {
            SubmitOutcome::Dispatched(request) => Reaction::Order(request),
            SubmitOutcome::Rejected(_) | SubmitOutcome::Ignored => Reaction::Render,
        },
        Command::Summary => Reaction::Print(calculator.summary().to_string()),
        Command::NewOrder => {
            calculator.new_order();
            Reaction::Render
        }
        Command::Dismiss => {
            calculator.dismiss_status();
            Reaction::Render
        }
        Command::Help => Reaction::Print(HELP.to_string()),
        Command::Quit => Reaction::Quit,
    }
}

fn mark(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn render_step(calculator: &Calculator, out: &mut String) -> std::fmt::Result {
    let draft = calculator.draft();

    match calculator.current_step() {
        Step::Delivery => {
            for marketplace in calculator.marketplaces() {
                let id = marketplace.id.to_string();
                writeln!(out, "  {} {} ({})", mark(draft.marketplace == id), marketplace.name, id)?;

                if draft.marketplace == id {
                    for warehouse in calculator.warehouses_for(&id) {
                        let warehouse_id = warehouse.id.to_string();
                        writeln!(
                            out,
                            "      {} {} ({})",
                            mark(draft.warehouse == warehouse_id),
                            warehouse.name,
                            warehouse_id
                        )?;
                    }
                }
            }
        }
        Step::Cargo => {
            let containers = &calculator.reference_data().containers;

            for kind in CargoKind::ALL {
                let selected = draft.selected_types.contains(&kind);
                write!(out, "  {} {}", mark(selected), kind)?;
                match draft.quantities.get(&kind) {
                    Some(quantity) if selected => writeln!(out, ": {} шт.", quantity)?,
                    _ => writeln!(out)?,
                }
            }

            if draft.selected_types.contains(&CargoKind::Box) {
                let sizes = containers.box_sizes.iter().map(|size| size.label.as_str());
                for size in sizes.chain([CUSTOM_BOX_SIZE]) {
                    writeln!(out, "      {} {}", mark(draft.box_size() == Some(size)), size)?;
                }
            }

            if draft.selected_types.contains(&CargoKind::Pallet) {
                let weights = containers
                    .pallet_weights
                    .iter()
                    .map(|weight| weight.label.as_str());
                for weight in weights.chain([CUSTOM_PALLET_WEIGHT]) {
                    writeln!(
                        out,
                        "      {} {}",
                        mark(draft.pallet_weight() == Some(weight)),
                        weight
                    )?;
                }
            }
        }
        Step::Services => {
            let reference = calculator.reference_data();
            if reference.services_from_fallback {
                writeln!(out, "  (каталог услуг загружен из встроенной копии)")?;
            }

            for group in reference.services.service_groups.iter() {
                writeln!(out, "  {}", group.title)?;
                for offer in group.services.iter() {
                    writeln!(
                        out,
                        "    {} {} ({}) {}{}",
                        mark(draft.has_service(&offer.id)),
                        offer.name,
                        offer.id,
                        offer.price,
                        if offer.requires_location {
                            ", требуется адрес забора"
                        } else {
                            ""
                        }
                    )?;
                }
            }

            if calculator.show_address_field() {
                writeln!(out, "  Адрес забора груза: {}", draft.pickup_address)?;
            }
        }
        Step::Contact => {
            writeln!(out, "  Имя: {}", draft.client_name)?;
            writeln!(out, "  Телефон: {}", draft.phone_number)?;
            writeln!(out, "  Компания: {}", draft.company)?;
            writeln!(out, "  Email: {}", draft.email)?;
            writeln!(out, "  Стоимость груза: {}", draft.cargo_value)?;
            writeln!(out, "  Комментарий: {}", draft.comments)?;
        }
    }

    if calculator.show_errors() {
        let address_check = match calculator.current_step() {
            Step::Services => AddressCheck::Submit,
            _ => AddressCheck::Browse,
        };
        let validation = validate_step(
            calculator.current_step(),
            draft,
            &calculator.reference_data().services,
            address_check,
        );

        for (field, message) in validation.errors.iter() {
            writeln!(out, "  ! {}: {}", field, message)?;
        }
    }

    let price = match draft.order_price {
        Some(price) => format!("{} ₽", price),
        None => String::from("Рассчитывается..."),
    };
    let loading = if calculator.is_price_loading() {
        " (обновляется)"
    } else {
        ""
    };
    writeln!(out, "Стоимость: {}{}", price, loading)
}

fn render_into(calculator: &Calculator, out: &mut String) -> std::fmt::Result {
    match calculator.state() {
        CalculatorState::Loading => writeln!(out, "Загрузка...")?,
        CalculatorState::LoadFailed(message) => writeln!(out, "{}", message)?,
        CalculatorState::Success(order) => {
            writeln!(out, "🎉 Заказ успешно создан!")?;
            writeln!(out, "Номер вашего заказа: {}", order.id)?;
            if let Some(date) = &order.delivery_date {
                writeln!(out, "Дата доставки: {}", date)?;
            }
            if let Some(cost) = order.total_cost {
                writeln!(out, "Общая стоимость: {} ₽", cost)?;
            }
            writeln!(out, "Введите `new`, чтобы создать новый заказ")?;
        }
        CalculatorState::Ready | CalculatorState::Submitting => {
            writeln!(out, "Шаг {}", calculator.current_step())?;
            render_step(calculator, out)?;
            if calculator.state() == &CalculatorState::Submitting {
                writeln!(out, "Заказ отправляется...")?;
            }
        }
    }

    if let Some(status) = calculator.status() {
        writeln!(out, "{}", status)?;
    }

    Ok(())
}

/// The text screen for the current state of the form.
pub fn render(calculator: &Calculator) -> String {
    let mut out = String::new();
    if render_into(calculator, &mut out).is_err() {
        log::error!("failed to render the form");
    }
    out
}
