use std::collections::HashMap;

use crate::{errors::Error, Result};

/// A typed slash-command argument as delivered by the platform.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
}

/// Platform-neutral inbound invocation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandRequest {
    pub name: String,
    pub arguments: HashMap<String, ArgValue>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn arg(mut self, key: impl Into<String>, value: ArgValue) -> Self {
        self.arguments.insert(key.into(), value);
        self
    }

    fn string(&self, key: &str) -> Result<String> {
        match self.arguments.get(key) {
            Some(ArgValue::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            Some(ArgValue::String(_)) => Err(invalid(key, "must not be empty")),
            Some(_) => Err(invalid(key, "must be text")),
            None => Err(missing(key)),
        }
    }

    fn opt_integer(&self, key: &str) -> Result<Option<i64>> {
        match self.arguments.get(key) {
            Some(ArgValue::Integer(n)) => Ok(Some(*n)),
            Some(_) => Err(invalid(key, "must be an integer")),
            None => Ok(None),
        }
    }

    fn integer(&self, key: &str) -> Result<i64> {
        self.opt_integer(key)?.ok_or_else(|| missing(key))
    }

    fn number(&self, key: &str) -> Result<f64> {
        match self.arguments.get(key) {
            Some(ArgValue::Number(x)) => Ok(*x),
            Some(ArgValue::Integer(n)) => Ok(*n as f64),
            Some(_) => Err(invalid(key, "must be a number")),
            None => Err(missing(key)),
        }
    }

    fn opt_boolean(&self, key: &str) -> Result<Option<bool>> {
        match self.arguments.get(key) {
            Some(ArgValue::Boolean(b)) => Ok(Some(*b)),
            Some(_) => Err(invalid(key, "must be true or false")),
            None => Ok(None),
        }
    }
}

fn missing(key: &str) -> Error {
    Error::Validation(format!("Missing required option `{key}`."))
}

fn invalid(key: &str, why: &str) -> Error {
    Error::Validation(format!("Option `{key}` {why}."))
}

/// Every command the bot understands, with its typed arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    GetInvoice {
        invoice_id: String,
    },
    ShopInfo,
    Balances,
    Groups,
    Coupons,
    ClaimRole {
        order_id: String,
    },
    DeleteCoupon {
        coupon_id: String,
    },
    Products {
        page: u32,
    },
    Product {
        product_id: String,
    },
    Group {
        group_id: String,
    },
    CreateCoupon {
        shop_id: String,
        code: String,
        discount: i64,
        kind: String,
        global: Option<bool>,
    },
    DeleteProduct {
        product_id: String,
    },
    EditPrice {
        product_id: String,
        price: f64,
    },
}

impl Command {
    pub fn parse(req: &CommandRequest) -> Result<Self> {
        let cmd = match req.name.as_str() {
            "getinvoice" => Command::GetInvoice {
                invoice_id: req.string("invoice_id")?,
            },
            "shopinfo" => Command::ShopInfo,
            "balances" => Command::Balances,
            "groups" => Command::Groups,
            "coupons" => Command::Coupons,
            "claimrole" => Command::ClaimRole {
                order_id: req.string("order_id")?,
            },
            "deletecoupon" => Command::DeleteCoupon {
                coupon_id: req.string("coupon_id")?,
            },
            "products" => Command::Products {
                page: parse_page(req.opt_integer("page")?)?,
            },
            "product" => Command::Product {
                product_id: req.string("product_id")?,
            },
            "group" => Command::Group {
                group_id: req.string("group_id")?,
            },
            "createcoupon" => Command::CreateCoupon {
                shop_id: req.string("shop_id")?,
                code: req.string("code")?,
                discount: req.integer("discount")?,
                kind: req.string("type")?,
                global: req.opt_boolean("global")?,
            },
            "deleteproduct" => Command::DeleteProduct {
                product_id: req.string("product_id")?,
            },
            "editprice" => {
                let price = req.number("price")?;
                if !price.is_finite() || price < 0.0 {
                    return Err(invalid("price", "must be a non-negative amount"));
                }
                Command::EditPrice {
                    product_id: req.string("product_id")?,
                    price,
                }
            }
            other => return Err(Error::Validation(format!("Unknown command `{other}`."))),
        };
        Ok(cmd)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::GetInvoice { .. } => "getinvoice",
            Command::ShopInfo => "shopinfo",
            Command::Balances => "balances",
            Command::Groups => "groups",
            Command::Coupons => "coupons",
            Command::ClaimRole { .. } => "claimrole",
            Command::DeleteCoupon { .. } => "deletecoupon",
            Command::Products { .. } => "products",
            Command::Product { .. } => "product",
            Command::Group { .. } => "group",
            Command::CreateCoupon { .. } => "createcoupon",
            Command::DeleteProduct { .. } => "deleteproduct",
            Command::EditPrice { .. } => "editprice",
        }
    }

    /// Commands that change shop state.
    pub fn requires_manage(&self) -> bool {
        matches!(
            self,
            Command::CreateCoupon { .. }
                | Command::DeleteCoupon { .. }
                | Command::DeleteProduct { .. }
                | Command::EditPrice { .. }
        )
    }
}

/// Absent page means the first page.
fn parse_page(page: Option<i64>) -> Result<u32> {
    match page {
        None => Ok(1),
        Some(n) if n >= 1 && n <= u32::MAX as i64 => Ok(n as u32),
        Some(_) => Err(invalid("page", "must be 1 or greater")),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Integer,
    Number,
    Boolean,
}

/// Registration schema of one command option.
#[derive(Clone, Copy, Debug)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OptionKind,
    pub required: bool,
}

/// Registration schema of one slash command.
#[derive(Clone, Copy, Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: &'static [OptionSpec],
    /// Mutates the shop; only members who can manage the server may run it.
    pub manage: bool,
}

const fn required(name: &'static str, description: &'static str, kind: OptionKind) -> OptionSpec {
    OptionSpec {
        name,
        description,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, description: &'static str, kind: OptionKind) -> OptionSpec {
    OptionSpec {
        name,
        description,
        kind,
        required: false,
    }
}

/// Everything registered with the platform at startup.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "getinvoice",
        description: "Fetch an invoice by ID",
        options: &[required("invoice_id", "The ID of the invoice", OptionKind::String)],
        manage: false,
    },
    CommandSpec {
        name: "shopinfo",
        description: "Get information about the shop",
        options: &[],
        manage: false,
    },
    CommandSpec {
        name: "balances",
        description: "Get the payout balances for the shop",
        options: &[],
        manage: false,
    },
    CommandSpec {
        name: "groups",
        description: "Fetch and display the list of groups for the shop",
        options: &[],
        manage: false,
    },
    CommandSpec {
        name: "coupons",
        description: "Fetch and display the list of coupons for the shop",
        options: &[],
        manage: false,
    },
    CommandSpec {
        name: "claimrole",
        description: "Claim Customer role",
        options: &[required("order_id", "The ID of the order", OptionKind::String)],
        manage: false,
    },
    CommandSpec {
        name: "deletecoupon",
        description: "Delete a coupon by ID",
        options: &[required(
            "coupon_id",
            "The ID of the coupon to delete",
            OptionKind::String,
        )],
        manage: true,
    },
    CommandSpec {
        name: "products",
        description: "Fetch products with pagination",
        options: &[optional(
            "page",
            "Page number of products to fetch",
            OptionKind::Integer,
        )],
        manage: false,
    },
    CommandSpec {
        name: "product",
        description: "Fetch a specific product by ID",
        options: &[required(
            "product_id",
            "The ID of the product to fetch",
            OptionKind::String,
        )],
        manage: false,
    },
    CommandSpec {
        name: "group",
        description: "Fetch a specific group by ID",
        options: &[required("group_id", "The ID of the group", OptionKind::String)],
        manage: false,
    },
    CommandSpec {
        name: "createcoupon",
        description: "Create a new coupon",
        options: &[
            required("shop_id", "Shop ID", OptionKind::String),
            required("code", "Coupon code", OptionKind::String),
            required("discount", "Discount amount", OptionKind::Integer),
            required("type", "Coupon type", OptionKind::String),
            optional("global", "Is the coupon global?", OptionKind::Boolean),
        ],
        manage: true,
    },
    CommandSpec {
        name: "deleteproduct",
        description: "Delete a product by ID",
        options: &[required(
            "product_id",
            "The ID of the product to delete",
            OptionKind::String,
        )],
        manage: true,
    },
    CommandSpec {
        name: "editprice",
        description: "Change the price of a product",
        options: &[
            required("product_id", "The ID of the product", OptionKind::String),
            required("price", "The new price", OptionKind::Number),
        ],
        manage: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: OptionKind) -> ArgValue {
        match kind {
            OptionKind::String => ArgValue::String("42".to_string()),
            OptionKind::Integer => ArgValue::Integer(2),
            OptionKind::Number => ArgValue::Number(1.5),
            OptionKind::Boolean => ArgValue::Boolean(true),
        }
    }

    #[test]
    fn every_registered_command_parses_with_its_required_options() {
        for spec in COMMANDS {
            let mut req = CommandRequest::new(spec.name);
            for opt in spec.options.iter().filter(|o| o.required) {
                req = req.arg(opt.name, sample(opt.kind));
            }
            let cmd = Command::parse(&req).unwrap_or_else(|e| panic!("{}: {e}", spec.name));
            assert_eq!(cmd.name(), spec.name);
        }
    }

    #[test]
    fn missing_required_option_is_rejected() {
        for spec in COMMANDS.iter().filter(|s| s.options.iter().any(|o| o.required)) {
            let err = Command::parse(&CommandRequest::new(spec.name)).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{}", spec.name);
        }
    }

    #[test]
    fn products_page_defaults_to_one() {
        let cmd = Command::parse(&CommandRequest::new("products")).unwrap();
        assert_eq!(cmd, Command::Products { page: 1 });

        let cmd =
            Command::parse(&CommandRequest::new("products").arg("page", ArgValue::Integer(3)))
                .unwrap();
        assert_eq!(cmd, Command::Products { page: 3 });

        assert!(
            Command::parse(&CommandRequest::new("products").arg("page", ArgValue::Integer(0)))
                .is_err()
        );
    }

    #[test]
    fn mistyped_and_blank_options_are_rejected() {
        let req = CommandRequest::new("getinvoice").arg("invoice_id", ArgValue::Integer(5));
        assert!(Command::parse(&req).is_err());

        let req = CommandRequest::new("getinvoice").arg("invoice_id", ArgValue::String("  ".into()));
        assert!(Command::parse(&req).is_err());
    }

    #[test]
    fn editprice_accepts_integer_price_and_rejects_negative() {
        let req = CommandRequest::new("editprice")
            .arg("product_id", ArgValue::String("9".into()))
            .arg("price", ArgValue::Integer(20));
        assert_eq!(
            Command::parse(&req).unwrap(),
            Command::EditPrice {
                product_id: "9".into(),
                price: 20.0
            }
        );

        let req = CommandRequest::new("editprice")
            .arg("product_id", ArgValue::String("9".into()))
            .arg("price", ArgValue::Number(-1.0));
        assert!(Command::parse(&req).is_err());
    }

    #[test]
    fn only_shop_mutations_require_manage() {
        let mut restricted = Vec::new();
        for spec in COMMANDS {
            let mut req = CommandRequest::new(spec.name);
            for opt in spec.options.iter().filter(|o| o.required) {
                req = req.arg(opt.name, sample(opt.kind));
            }
            let cmd = Command::parse(&req).unwrap();
            assert_eq!(cmd.requires_manage(), spec.manage, "{}", spec.name);
            if spec.manage {
                restricted.push(spec.name);
            }
        }
        assert_eq!(
            restricted,
            vec!["deletecoupon", "createcoupon", "deleteproduct", "editprice"]
        );
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Command::parse(&CommandRequest::new("ping")).is_err());
    }
}
