//! Terminal output.
//!
//! Everything the CLI shows goes through here: results to stdout, failures
//! to stderr. Logs are written to stderr by the tracing subscriber.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use fruit_mall_storefront::api::{
    CartItem, Category, CurrentUser, Order, OrderDetail, Product, Review, ReviewSummary,
    WishlistItem,
};
use fruit_mall_storefront::cart::CartTotals;
use fruit_mall_storefront::catalog::{CatalogPage, CatalogSort};
use fruit_mall_storefront::format::{format_datetime, format_rating, truncate};
use fruit_mall_storefront::routes::RouteDecision;

/// Longest product description shown in a listing.
const DESCRIPTION_PREVIEW: usize = 60;

pub fn failure(message: &str) {
    eprintln!("error: {message}");
}

pub fn success(message: &str) {
    println!("{message}");
}

pub fn user(user: &CurrentUser) {
    println!("{} ({})", user.name, user.username);
    println!("  email: {}", user.email);
    if let Some(phone) = &user.phone_number {
        println!("  phone: {phone}");
    }
    if let Some(address) = &user.address {
        println!("  address: {address}");
    }
    let roles: Vec<&str> = user.roles.iter().map(|r| r.as_str()).collect();
    println!("  roles: {}", roles.join(", "));
}

fn product_line(product: &Product) {
    let stock = if product.in_stock() { "" } else { "  [sold out]" };
    println!(
        "#{:<4} {:<24} {:>10}  {} / {}{stock}",
        product.id, product.name, product.price.to_string(), product.origin, product.season
    );
}

pub fn products(products: &[Product]) {
    if products.is_empty() {
        println!("No products.");
    }
    for product in products {
        product_line(product);
    }
}

pub fn catalog_page(page: &CatalogPage, sort: CatalogSort) {
    products(&page.items);
    if page.total_pages > 0 {
        println!(
            "-- page {} of {} ({} products, sorted by {})",
            page.page,
            page.total_pages,
            page.total_matches,
            sort.label()
        );
    }
}

pub fn product_detail(product: &Product, reviews: &ReviewSummary) {
    println!("{} (#{})", product.name, product.id);
    println!("  price:    {}", product.price);
    println!("  origin:   {}", product.origin);
    println!("  season:   {}", product.season);
    println!("  category: {}", product.category_name);
    println!("  stock:    {}", product.stock_quantity);
    if let Some(description) = &product.description {
        println!("  {}", truncate(description, DESCRIPTION_PREVIEW));
    }
    println!(
        "  rating:   {} ({} reviews)",
        format_rating(reviews.average_rating),
        reviews.review_count
    );
    review_list(&reviews.reviews);
}

pub fn categories(categories: &[Category]) {
    for category in categories {
        println!("#{:<4} {}", category.id, category.name);
    }
}

pub fn cart(items: &[CartItem], totals: &CartTotals) {
    if items.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for item in items {
        println!(
            "line {:<4} {:<24} {:>10} x {:<3} = {}",
            item.id,
            item.fruit_name,
            item.fruit_price.to_string(),
            item.quantity,
            item.line_total()
        );
    }
    println!("items:     {}", totals.item_count);
    println!("subtotal:  {}", totals.subtotal);
    println!("shipping:  {}", totals.shipping_fee);
    println!("total:     {}", totals.grand_total);
    if !totals.free_shipping_remaining.is_zero() {
        println!(
            "Add {} more for free shipping.",
            totals.free_shipping_remaining
        );
    }
}

pub fn wishlist(items: &[WishlistItem]) {
    if items.is_empty() {
        println!("Your wishlist is empty.");
    }
    for item in items {
        println!(
            "#{:<4} {:<24} {:>10}  {}",
            item.fruit_id,
            item.fruit_name,
            item.fruit_price.to_string(),
            item.origin
        );
    }
}

pub fn orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders yet.");
    }
    for order in orders {
        println!(
            "order {:<5} {}  {:<10} {:>12}  {} item(s)",
            order.id,
            format_datetime(order.order_date),
            order.order_status.label(),
            order.total_price.to_string(),
            order.order_details.len()
        );
    }
}

pub fn order(order: &Order) {
    println!(
        "Order {} placed {}",
        order.id,
        format_datetime(order.order_date)
    );
    println!("  status:  {}", order.order_status.label());
    println!("  payment: {}", order.payment_method);
    order_lines(&order.order_details);
    println!("  total:   {}", order.total_price);
}

pub fn order_lines(lines: &[OrderDetail]) {
    for line in lines {
        println!(
            "  line {:<5} {:<24} {:>10} x {}",
            line.id,
            line.fruit_name,
            line.unit_price.to_string(),
            line.quantity
        );
    }
}

pub fn review_list(reviews: &[Review]) {
    for review in reviews {
        println!(
            "  [{}] {}/5 {} ({}): {}",
            review.id,
            review.rating,
            review.fruit_name,
            format_datetime(review.review_date),
            review.content
        );
    }
}

pub fn route(decision: &RouteDecision) {
    match decision {
        RouteDecision::Allow(route) => println!("{route}"),
        RouteDecision::Redirect { from, to } => println!("{from} -> {to}"),
    }
}
