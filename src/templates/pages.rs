use maud::{html, Markup};

use crate::domain::{Room, RoomStatus};
use crate::templates::desktop_layout;

pub struct DashboardVm {
    pub rooms: Vec<Room>,
    pub reservation_count: usize,
    pub checkins_this_month: i64,
}

impl DashboardVm {
    fn count(&self, status: RoomStatus) -> usize {
        self.rooms.iter().filter(|r| r.status == status).count()
    }
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "Hotel Dashboard",
        html! {
            main class="container" {
                h1 { "Rooms" }

                section class="card" {
                    p {
                        strong { (vm.rooms.len()) } " rooms, "
                        strong { (vm.count(RoomStatus::Occupied)) } " occupied, "
                        strong { (vm.count(RoomStatus::Available)) } " available, "
                        strong { (vm.count(RoomStatus::Maintenance)) } " in maintenance"
                    }
                    p { strong { (vm.reservation_count) } " future reservations" }
                    p { strong { (vm.checkins_this_month) } " check-ins this month" }
                }

                table {
                    thead {
                        tr {
                            th { "Number" }
                            th { "Type" }
                            th { "Capacity" }
                            th { "Price" }
                            th { "Status" }
                            th { "Guest" }
                        }
                    }
                    tbody {
                        @for room in &vm.rooms {
                            tr {
                                td { (room.number) }
                                td { (room.room_type) }
                                td { (room.capacity) }
                                td { "R$ " (format!("{:.2}", room.price)) }
                                td { (room.status) }
                                td {
                                    @match &room.guest {
                                        Some(g) => { (g.name) },
                                        None => { "-" },
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
