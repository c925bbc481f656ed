use prettytable::{row, Table};
use sim_payment_engine::db_types::Order;

pub fn print_orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders.");
        return;
    }
    let mut table = Table::new();
    table.add_row(row!["Order", "Buyer", "Operator", "Tariff", "Price", "Mode", "Status", "Created"]);
    for order in orders {
        table.add_row(row![
            order.order_id.value(),
            order.buyer_id,
            order.operator_name,
            order.tariff_name,
            order.connection_price,
            order.mode,
            order.status,
            order.created_at.format("%Y-%m-%d %H:%M")
        ]);
    }
    table.printstd();
}

pub fn print_order_details(order: &Order) {
    println!("Order {}", order.order_id);
    println!("  Status:            {}", order.status);
    println!("  Created:           {}", order.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Buyer:             {} (@{})", order.buyer_id, order.username.as_deref().unwrap_or("-"));
    println!("  Operator / tariff: {} / {}", order.operator_name, order.tariff_name);
    match order.monthly_fee {
        Some(fee) => println!("  Monthly fee:       {fee}"),
        None => println!("  Monthly fee:       -"),
    }
    println!("  Connection price:  {}", order.connection_price);
    println!("  Fulfilment:        {}", order.mode);
    if let Some(phone) = &order.transfer_phone {
        println!("  Transfer phone:    {phone}");
    }
    println!("  Full name:         {}", order.full_name);
    println!("  Region/city:       {}", order.region_city);
    println!("  Documents:         {} / {}", order.passport_photo_1, order.passport_photo_2);
    if let Some(receipt) = &order.payment_receipt {
        println!("  Receipt:           {receipt} ({})", order.payment_method_name.as_deref().unwrap_or("?"));
    }
    if let Some(confirmed) = order.payment_confirmed_at {
        println!("  Payment confirmed: {}", confirmed.format("%Y-%m-%d %H:%M:%S"));
    }
}
