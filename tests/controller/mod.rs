mod leagues;
mod offers;
